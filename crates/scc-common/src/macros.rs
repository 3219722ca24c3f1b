//! Per-channel macro sequencer.
//!
//! Each channel runs one sequencer. On note-on the driver feeds it the
//! channel's instrument; every tick it calls [`MacroSequencer::next`] and reads
//! the per-macro [`MacroState`] flags:
//!
//! - `has`: the macro is running and will keep producing values
//! - `had`: the last step produced a value in `val`
//! - `finished`: the macro stopped on the step before this one
//!
//! Feeding `None` stops every macro; that is how silence is represented.

use std::sync::Arc;

use crate::song::{Instrument, InstrumentMacros, MacroData, MacroMode};

/// Which instrument macro a state belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    /// Volume.
    Vol,
    /// Arpeggio.
    Arp,
    /// Wavetable.
    Wave,
    /// Pitch.
    Pitch,
}

impl MacroKind {
    /// All kinds, in evaluation order.
    pub const ALL: [MacroKind; 4] = [
        MacroKind::Vol,
        MacroKind::Arp,
        MacroKind::Wave,
        MacroKind::Pitch,
    ];

    fn source(self, macros: &InstrumentMacros) -> &MacroData {
        match self {
            MacroKind::Vol => &macros.vol,
            MacroKind::Arp => &macros.arp,
            MacroKind::Wave => &macros.wave,
            MacroKind::Pitch => &macros.pitch,
        }
    }
}

/// Playback state of one macro.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MacroState {
    /// Value produced by the last step.
    pub val: i32,
    /// The last step produced a value.
    pub had: bool,
    /// The macro is running.
    pub has: bool,
    /// The macro stopped on the previous step.
    pub finished: bool,
    /// Interpretation of `val`.
    pub mode: MacroMode,
    pos: usize,
}

impl MacroState {
    fn init(&mut self, source: Option<&MacroData>) {
        *self = Self::default();
        if let Some(source) = source.filter(|s| !s.is_empty()) {
            self.has = true;
            self.had = true;
            self.mode = source.mode;
        }
    }

    fn step(&mut self, source: Option<&MacroData>, released: bool) {
        self.finished = self.had != self.has;
        self.had = self.has;
        if !self.has {
            return;
        }
        let Some(source) = source.filter(|s| !s.is_empty()) else {
            self.has = false;
            return;
        };

        let len = source.len();
        let release = source.release_point.filter(|&r| r < len);
        let loop_point = source.loop_point.filter(|&l| l < len);

        self.val = source.values[self.pos];
        self.pos += 1;

        if let Some(release) = release {
            if self.pos > release && !released {
                match loop_point.filter(|&l| l < release) {
                    Some(l) => self.pos = l,
                    None => self.pos -= 1,
                }
            }
        }

        if self.pos >= len {
            match loop_point.filter(|&l| release.map_or(true, |r| l >= r)) {
                Some(l) => self.pos = l,
                None => self.has = false,
            }
        }
    }

    fn queued(&self, source: &MacroData) -> Option<i32> {
        if self.has {
            source.values.get(self.pos).copied()
        } else {
            None
        }
    }
}

/// Runs the volume, arpeggio, wave and pitch macros of one instrument.
#[derive(Debug, Clone, Default)]
pub struct MacroSequencer {
    instrument: Option<Arc<Instrument>>,
    released: bool,
    /// Volume macro.
    pub vol: MacroState,
    /// Arpeggio macro.
    pub arp: MacroState,
    /// Wave macro.
    pub wave: MacroState,
    /// Pitch macro.
    pub pitch: MacroState,
}

impl MacroSequencer {
    /// Create a stopped sequencer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart all macros from `instrument`, or stop them all with `None`.
    pub fn init(&mut self, instrument: Option<Arc<Instrument>>) {
        self.released = false;
        for kind in MacroKind::ALL {
            let source = instrument.as_deref().map(|ins| kind.source(&ins.macros));
            self.state_mut(kind).init(source);
        }
        self.instrument = instrument;
    }

    /// Advance every macro by one step.
    pub fn next(&mut self) {
        let instrument = self.instrument.clone();
        for kind in MacroKind::ALL {
            let source = instrument.as_deref().map(|ins| kind.source(&ins.macros));
            let released = self.released;
            self.state_mut(kind).step(source, released);
        }
    }

    /// Let macros run past their release points.
    pub fn release(&mut self) {
        self.released = true;
    }

    /// Whether [`release`](Self::release) was called since the last init.
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Value the next step of `kind` will produce, while that macro is running.
    pub fn queued(&self, kind: MacroKind) -> Option<i32> {
        let instrument = self.instrument.as_deref()?;
        self.state(kind).queued(kind.source(&instrument.macros))
    }

    /// The instrument currently driving the macros.
    pub fn instrument(&self) -> Option<&Arc<Instrument>> {
        self.instrument.as_ref()
    }

    /// Stop the macros if they are driven by `instrument`.
    pub fn notify_instrument_removed(&mut self, instrument: &Arc<Instrument>) {
        if self
            .instrument
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, instrument))
        {
            log::debug!("macro instrument '{}' removed, stopping macros", instrument.name);
            self.init(None);
        }
    }

    /// State of one macro.
    pub fn state(&self, kind: MacroKind) -> &MacroState {
        match kind {
            MacroKind::Vol => &self.vol,
            MacroKind::Arp => &self.arp,
            MacroKind::Wave => &self.wave,
            MacroKind::Pitch => &self.pitch,
        }
    }

    fn state_mut(&mut self, kind: MacroKind) -> &mut MacroState {
        match kind {
            MacroKind::Vol => &mut self.vol,
            MacroKind::Arp => &mut self.arp,
            MacroKind::Wave => &mut self.wave,
            MacroKind::Pitch => &mut self.pitch,
        }
    }
}
