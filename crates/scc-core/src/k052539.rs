//! K052539 (SCC+) core
//!
//! | Range       | Function                                      |
//! |-------------|-----------------------------------------------|
//! | `0x00-0x9f` | waveforms of voices 1-5, one window each      |
//! | `0xa0-0xaf` | periods, volumes, enable mask (mirrored 0xb0) |
//! | `0xc0-0xdf` | test register                                 |

use crate::backend::SccBackend;
use crate::model::ChipModel;
use crate::voice::VoiceBank;
use crate::WAVE_LENGTH;

/// Konami K052539 emulation
#[derive(Debug, Clone, Default)]
pub struct K052539 {
    bank: VoiceBank,
}

impl K052539 {
    /// Create a chip in its power-on state
    pub fn new() -> Self {
        Self::default()
    }
}

impl SccBackend for K052539 {
    fn model(&self) -> ChipModel {
        ChipModel::SccPlus
    }

    fn reset(&mut self) {
        self.bank.reset();
    }

    fn write(&mut self, addr: u8, value: u8) {
        self.bank.regs[addr as usize] = value;
        match addr {
            0x00..=0x9f => {
                let voice = (addr as usize) / WAVE_LENGTH;
                self.bank.write_wave(voice, addr as usize % WAVE_LENGTH, value);
            }
            0xa0..=0xbf => self.bank.write_control(addr, value),
            _ => {}
        }
    }

    fn read(&self, addr: u8) -> u8 {
        self.bank.regs[addr as usize]
    }

    fn tick(&mut self) {
        self.bank.tick();
    }

    fn out(&self) -> i32 {
        self.bank.out()
    }

    fn chan_out(&self, channel: usize) -> i32 {
        self.bank.chan_out(channel)
    }

    fn wave_window(&self, channel: usize) -> usize {
        channel
    }
}
