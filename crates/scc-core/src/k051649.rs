//! K051649 (SCC) core
//!
//! Memory map as seen from the cartridge's SCC window:
//!
//! | Range       | Function                                      |
//! |-------------|-----------------------------------------------|
//! | `0x00-0x5f` | waveforms of voices 1-3                       |
//! | `0x60-0x7f` | waveform shared by voices 4 and 5             |
//! | `0x80-0x8f` | periods, volumes, enable mask (mirrored 0x90) |
//! | `0xe0-0xff` | test register                                 |

use crate::backend::SccBackend;
use crate::model::ChipModel;
use crate::voice::VoiceBank;
use crate::WAVE_LENGTH;

/// Konami K051649 emulation
#[derive(Debug, Clone, Default)]
pub struct K051649 {
    bank: VoiceBank,
}

impl K051649 {
    /// Create a chip in its power-on state
    pub fn new() -> Self {
        Self::default()
    }
}

impl SccBackend for K051649 {
    fn model(&self) -> ChipModel {
        ChipModel::Scc
    }

    fn reset(&mut self) {
        self.bank.reset();
    }

    fn write(&mut self, addr: u8, value: u8) {
        self.bank.regs[addr as usize] = value;
        match addr {
            0x00..=0x7f => {
                let voice = (addr as usize) / WAVE_LENGTH;
                let index = addr as usize % WAVE_LENGTH;
                self.bank.write_wave(voice, index, value);
                // the fourth window feeds voice 5 as well
                if voice == 3 {
                    self.bank.write_wave(4, index, value);
                }
            }
            0x80..=0x9f => self.bank.write_control(addr, value),
            // 0xa0-0xdf is not decoded on writes; the test register has no audible effect
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
        if channel >= 4 {
            3
        } else {
            channel
        }
    }
}
