//! Per-tick channel update
//!
//! Runs once per song tick, channels in index order. For each channel the
//! macros advance one step, their values are folded into the channel state,
//! and whatever changed is written to the chip:
//!
//! 1. volume macro → volume register
//! 2. arpeggio macro → base period (left alone during portamento)
//! 3. wave macro → wave synth
//! 4. pitch macro → `pitch2`
//! 5. wave synth step → waveform memory
//! 6. pending frequency change → frequency registers

use scc_common::{MacroMode, CHANNEL_COUNT};
use scc_core::{REG_FREQ, REG_VOLUME};

use crate::channel::{FREQ_MAX, PITCH2_RANGE, VOLUME_MAX};
use crate::driver::SccDriver;
use crate::wave::update_wave;

impl SccDriver {
    /// Advance every channel by one song tick.
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        for ch in 0..CHANNEL_COUNT {
            self.tick_channel(ch);
        }
    }

    fn tick_channel(&mut self, ch: usize) {
        let base = self.base;
        let pitch = self.pitch;
        let chan = &mut self.channels[ch];
        chan.macros.next();

        if chan.macros.vol.had {
            let scale = chan.macros.vol.val.min(VOLUME_MAX);
            chan.out_vol = ((chan.vol & VOLUME_MAX) * scale / VOLUME_MAX).clamp(0, VOLUME_MAX);
            self.bus.write(
                base + (REG_VOLUME as usize + ch) as u32,
                chan.out_vol as u16,
            );
        }

        let arp = &chan.macros.arp;
        if arp.had {
            if !chan.in_porta {
                chan.base_freq = match arp.mode {
                    MacroMode::Absolute => pitch.note_period(arp.val),
                    MacroMode::Relative => pitch.note_period(chan.note.saturating_add(arp.val)),
                };
            }
            chan.freq_changed = true;
        } else if arp.mode == MacroMode::Absolute && arp.finished {
            chan.base_freq = pitch.note_period(chan.note);
            chan.freq_changed = true;
        }

        if chan.macros.wave.had {
            if let Ok(wave) = usize::try_from(chan.macros.wave.val) {
                if chan.wave != Some(wave) || chan.synth.active_changed() {
                    chan.wave = Some(wave);
                    chan.synth.change_wave1(wave);
                }
            }
        }

        let bend = &chan.macros.pitch;
        if bend.had {
            let pitch2 = match bend.mode {
                MacroMode::Relative => chan.pitch2.saturating_add(bend.val),
                MacroMode::Absolute => bend.val,
            };
            chan.pitch2 = pitch2.clamp(*PITCH2_RANGE.start(), *PITCH2_RANGE.end());
            chan.freq_changed = true;
        }

        if chan.active && chan.synth.tick() {
            update_wave(&mut self.bus, ch, chan.synth.output());
        }

        if chan.freq_changed {
            let freq = pitch.calc_freq(chan.base_freq, chan.pitch, chan.pitch2);
            // period 0 is not addressable, the register holds period - 1
            chan.freq = (freq.clamp(0, FREQ_MAX) - 1).max(0);
            let reg = base + (REG_FREQ as usize + ch * 2) as u32;
            self.bus.write(reg, (chan.freq & 0xff) as u16);
            self.bus.write(reg + 1, (chan.freq >> 8) as u16);
            chan.freq_changed = false;
        }
    }
}
