//! Command dispatch
//!
//! One handler per [`Command`] variant. Handlers mutate channel state and
//! write registers immediately where the chip must change right away
//! (enable mask, volume); frequency changes are deferred to the next tick.

use scc_common::{MacroKind, MacroMode};
use scc_core::{REG_ENABLE, REG_VOLUME, WAVE_LENGTH};

use crate::channel::{VOLUME_MAX, WAVE_HEIGHT};
use crate::command::{Command, Response, EFFECT_CHANGE_WAVE};
use crate::driver::SccDriver;

impl SccDriver {
    /// Apply `command` to channel `ch`.
    ///
    /// # Panics
    ///
    /// Panics if `ch` is not a channel index.
    pub fn dispatch(&mut self, ch: usize, command: Command) -> Response {
        log::trace!("scc ch{ch}: {command:?}");
        match command {
            Command::NoteOn { note } => self.note_on(ch, note),
            Command::NoteOff => self.note_off(ch),
            Command::NoteOffEnv | Command::EnvRelease => self.channels[ch].macros.release(),
            Command::Instrument { index, force } => self.set_instrument(ch, index, force),
            Command::Volume(vol) => self.set_volume(ch, vol),
            Command::GetVolume => return Response::Value(self.volume(ch)),
            Command::Pitch(pitch) => {
                let chan = &mut self.channels[ch];
                chan.pitch = pitch;
                chan.freq_changed = true;
            }
            Command::Wave(wave) => {
                let chan = &mut self.channels[ch];
                chan.wave = Some(wave);
                chan.synth.change_wave1(wave);
            }
            Command::NotePorta { step, target } => return self.note_porta(ch, step, target),
            Command::Legato(note) => self.legato(ch, note),
            Command::PrePorta { in_porta, starting } => self.pre_porta(ch, in_porta, starting),
            Command::GetVolMax => return Response::Value(VOLUME_MAX),
            Command::AlwaysSetVolume => return Response::Value(1),
        }
        Response::Ok
    }

    /// Apply an effect column entry. Returns `false` for effects this chip ignores.
    pub fn handle_effect(&mut self, ch: usize, effect: u8, value: u8) -> bool {
        match effect {
            EFFECT_CHANGE_WAVE => {
                self.dispatch(ch, Command::Wave(value as usize));
                true
            }
            _ => false,
        }
    }

    /// Description of an effect column code, if this chip handles it.
    pub fn effect_name(&self, effect: u8) -> Option<&'static str> {
        crate::command::effect_name(effect)
    }

    fn note_on(&mut self, ch: usize, note: Option<i32>) {
        let ins = self.instrument_of(ch);
        let chan = &mut self.channels[ch];
        if let Some(note) = note {
            chan.base_freq = self.pitch.note_period(note);
            chan.freq_changed = true;
            chan.note = note;
        }
        chan.active = true;
        chan.macros.init(ins.clone());
        if chan.wave.is_none() {
            chan.wave = Some(0);
            chan.synth.change_wave1(0);
        }
        chan.synth
            .init(ins.as_deref(), WAVE_LENGTH, WAVE_HEIGHT, chan.ins_changed);
        chan.ins_changed = false;

        if !self.muted[ch] {
            self.bus.set_enable(self.base + REG_ENABLE as u32, ch, true);
        }
    }

    fn note_off(&mut self, ch: usize) {
        let chan = &mut self.channels[ch];
        chan.active = false;
        chan.macros.init(None);
        self.bus.set_enable(self.base + REG_ENABLE as u32, ch, false);
    }

    fn set_instrument(&mut self, ch: usize, index: usize, force: bool) {
        let chan = &mut self.channels[ch];
        if chan.ins != Some(index) || force {
            chan.ins = Some(index);
            chan.ins_changed = true;
        }
    }

    fn set_volume(&mut self, ch: usize, vol: i32) {
        let vol = vol.clamp(0, VOLUME_MAX);
        let chan = &mut self.channels[ch];
        if chan.vol == vol {
            return;
        }
        chan.vol = vol;
        if !chan.macros.vol.has {
            chan.out_vol = vol;
            self.bus
                .write(self.base + (REG_VOLUME as usize + ch) as u32, vol as u16);
        }
    }

    fn volume(&self, ch: usize) -> i32 {
        let chan = &self.channels[ch];
        if chan.macros.vol.has {
            chan.vol
        } else {
            chan.out_vol
        }
    }

    fn note_porta(&mut self, ch: usize, step: i32, target: i32) -> Response {
        let dest = self.pitch.note_period(target);
        let chan = &mut self.channels[ch];

        let reached = if chan.base_freq == dest {
            chan.in_porta
        } else if dest > chan.base_freq {
            chan.base_freq = chan.base_freq.saturating_add(step).min(dest);
            chan.base_freq == dest
        } else {
            chan.base_freq = chan.base_freq.saturating_sub(step).max(dest);
            chan.base_freq == dest
        };
        chan.freq_changed = true;

        if reached {
            chan.in_porta = false;
            Response::PortaReached
        } else {
            Response::Ok
        }
    }

    fn legato(&mut self, ch: usize, note: i32) {
        let chan = &mut self.channels[ch];
        let offset = match chan.macros.arp.mode {
            MacroMode::Relative => chan.macros.queued(MacroKind::Arp).unwrap_or(0),
            MacroMode::Absolute => 0,
        };
        chan.base_freq = self.pitch.note_period(note.saturating_add(offset));
        chan.freq_changed = true;
        chan.note = note;
    }

    fn pre_porta(&mut self, ch: usize, in_porta: bool, starting: bool) {
        if self.channels[ch].active && starting && self.song.compat.reset_macro_on_porta {
            let ins = self.instrument_of(ch);
            self.channels[ch].macros.init(ins);
        }
        self.channels[ch].in_porta = in_porta;
    }
}
