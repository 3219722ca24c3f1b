//! Per-channel driver state

use std::sync::Arc;

use scc_common::{MacroSequencer, Song, WaveSynth};
use scc_core::WAVE_LENGTH;

/// Largest channel volume.
pub const VOLUME_MAX: i32 = 15;

/// Pitch macro accumulator bounds.
pub const PITCH2_RANGE: std::ops::RangeInclusive<i32> = -2048..=2048;

/// Largest value the 12-bit frequency registers take.
pub const FREQ_MAX: i32 = 4095;

/// Synth output height; samples are re-biased to signed bytes on upload.
pub(crate) const WAVE_HEIGHT: i32 = 255;

/// State of one SCC channel
///
/// The macro sequencer and wave synthesizer belong to the channel alone.
#[derive(Debug, Clone)]
pub struct Channel {
    /// Current note.
    pub note: i32,
    /// Period of the note before bends.
    pub base_freq: i32,
    /// Last value written to the frequency registers.
    pub freq: i32,
    /// Effect pitch offset.
    pub pitch: i32,
    /// Pitch macro offset, within [`PITCH2_RANGE`].
    pub pitch2: i32,
    /// Channel volume, 0-15.
    pub vol: i32,
    /// Volume after the volume macro, 0-15.
    pub out_vol: i32,
    /// Selected wavetable; `None` until one is chosen.
    pub wave: Option<usize>,
    /// Selected instrument.
    pub ins: Option<usize>,
    /// A note is playing.
    pub active: bool,
    /// A portamento is in progress.
    pub in_porta: bool,
    /// The instrument changed since the last note-on.
    pub ins_changed: bool,
    /// The frequency registers must be rewritten on the next tick.
    pub freq_changed: bool,
    pub(crate) macros: MacroSequencer,
    pub(crate) synth: WaveSynth,
}

impl Channel {
    pub(crate) fn new(song: Arc<Song>) -> Self {
        let mut synth = WaveSynth::new(song);
        synth.init(None, WAVE_LENGTH, WAVE_HEIGHT, false);
        Self {
            note: 0,
            base_freq: 0,
            freq: 0,
            pitch: 0,
            pitch2: 0,
            vol: VOLUME_MAX,
            out_vol: VOLUME_MAX,
            wave: None,
            ins: None,
            active: false,
            in_porta: false,
            ins_changed: true,
            freq_changed: false,
            macros: MacroSequencer::new(),
            synth,
        }
    }

    /// Macro sequencer driving this channel.
    pub fn macros(&self) -> &MacroSequencer {
        &self.macros
    }

    /// Wave synthesizer of this channel.
    pub fn synth(&self) -> &WaveSynth {
        &self.synth
    }
}
