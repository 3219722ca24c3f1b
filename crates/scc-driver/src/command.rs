//! Commands a sequencer sends to the driver

use serde::{Deserialize, Serialize};

/// Effect column code that selects the channel's wavetable.
pub const EFFECT_CHANGE_WAVE: u8 = 0x10;

/// A musical command for one channel
///
/// Serializes in snake case (`{"note_on": {"note": 60}}`, `{"volume": 12}`,
/// `"note_off"`) so scores can carry commands directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    /// Start a note. `None` retriggers the current one.
    NoteOn {
        /// Note number.
        #[serde(default)]
        note: Option<i32>,
    },
    /// Stop the note and its macros.
    NoteOff,
    /// Release the macros but keep the channel sounding.
    NoteOffEnv,
    /// Release the macros.
    EnvRelease,
    /// Select an instrument.
    Instrument {
        /// Instrument index.
        index: usize,
        /// Apply even when the index is unchanged.
        #[serde(default)]
        force: bool,
    },
    /// Set the channel volume, 0-15.
    Volume(i32),
    /// Query the volume.
    GetVolume,
    /// Set the effect pitch offset.
    Pitch(i32),
    /// Select a wavetable.
    Wave(usize),
    /// Slide toward `target` by `step` period units.
    NotePorta {
        /// Period change per call.
        step: i32,
        /// Note to slide to.
        target: i32,
    },
    /// Change note without retriggering.
    Legato(i32),
    /// Portamento is about to start or stop.
    PrePorta {
        /// New portamento state.
        in_porta: bool,
        /// A slide begins on this row.
        #[serde(default)]
        starting: bool,
    },
    /// Query the volume resolution.
    GetVolMax,
    /// Query whether volume changes need explicit register writes.
    AlwaysSetVolume,
}

/// Result of [`dispatch`](crate::SccDriver::dispatch)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Command handled.
    Ok,
    /// A portamento reached its target.
    PortaReached,
    /// Answer to a query.
    Value(i32),
}

impl Response {
    /// Integer form expected by engine hosts: 1 for `Ok`, 2 for `PortaReached`.
    pub fn code(self) -> i32 {
        match self {
            Response::Ok => 1,
            Response::PortaReached => 2,
            Response::Value(v) => v,
        }
    }
}

/// Description of an effect column code this driver understands.
pub fn effect_name(effect: u8) -> Option<&'static str> {
    match effect {
        EFFECT_CHANGE_WAVE => Some("10xx: Change waveform"),
        _ => None,
    }
}
