use crate::WAVE_LENGTH;

/// Periods at or below this value stop the wave position counter.
const MIN_RUNNING_PERIOD: u16 = 8;

/// One SCC voice: 32-sample waveform, 12-bit period, 4-bit volume.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Voice {
    pub(crate) wave: [i8; WAVE_LENGTH],
    pub(crate) period: u16,
    pub(crate) volume: u8,
    pub(crate) enabled: bool,
    counter: i32,
    position: usize,
    out: i32,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            wave: [0; WAVE_LENGTH],
            period: 0,
            volume: 0,
            enabled: false,
            counter: 0,
            position: 0,
            out: 0,
        }
    }
}

impl Voice {
    pub(crate) fn tick(&mut self) {
        if self.period > MIN_RUNNING_PERIOD {
            self.counter -= 1;
            if self.counter < 0 {
                self.position = (self.position + 1) & (WAVE_LENGTH - 1);
                self.counter = self.period as i32;
            }
        }

        // 8-bit sample scaled by 4-bit volume: 11-bit signed output
        self.out = if self.enabled {
            (self.wave[self.position] as i32 * self.volume as i32) >> 4
        } else {
            0
        };
    }

    pub(crate) fn set_period_low(&mut self, value: u8) {
        self.period = (self.period & 0x0f00) | value as u16;
        self.counter = self.period as i32;
    }

    pub(crate) fn set_period_high(&mut self, value: u8) {
        self.period = (self.period & 0x00ff) | (((value & 0x0f) as u16) << 8);
        self.counter = self.period as i32;
    }

    pub(crate) fn out(&self) -> i32 {
        self.out
    }
}

/// Five voices plus the control block shared by both variants.
#[derive(Debug, Clone)]
pub(crate) struct VoiceBank {
    pub(crate) voices: [Voice; crate::VOICE_COUNT],
    pub(crate) regs: [u8; 256],
    out: i32,
}

impl Default for VoiceBank {
    fn default() -> Self {
        Self {
            voices: [Voice::default(); crate::VOICE_COUNT],
            regs: [0; 256],
            out: 0,
        }
    }
}

impl VoiceBank {
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// Decode a write to the 16-byte control block (`offset` is relative to the register base).
    pub(crate) fn write_control(&mut self, offset: u8, value: u8) {
        match offset & 0x0f {
            reg @ 0x00..=0x09 => {
                let voice = &mut self.voices[(reg >> 1) as usize];
                if reg & 1 == 0 {
                    voice.set_period_low(value);
                } else {
                    voice.set_period_high(value);
                }
            }
            reg @ 0x0a..=0x0e => {
                self.voices[(reg - 0x0a) as usize].volume = value & 0x0f;
            }
            _ => {
                for (i, voice) in self.voices.iter_mut().enumerate() {
                    voice.enabled = value & (1 << i) != 0;
                }
            }
        }
    }

    pub(crate) fn write_wave(&mut self, voice: usize, index: usize, value: u8) {
        self.voices[voice].wave[index & (WAVE_LENGTH - 1)] = value as i8;
    }

    pub(crate) fn tick(&mut self) {
        self.out = 0;
        for voice in self.voices.iter_mut() {
            voice.tick();
            self.out += voice.out();
        }
    }

    pub(crate) fn out(&self) -> i32 {
        self.out
    }

    pub(crate) fn chan_out(&self, channel: usize) -> i32 {
        self.voices.get(channel).map_or(0, Voice::out)
    }
}
