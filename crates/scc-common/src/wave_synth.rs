//! Per-channel wavetable synthesizer.
//!
//! Holds the waveform a channel should currently play. Without a synth
//! instrument it simply renders the selected wavetable; with one it evolves
//! the waveform a little on every step. The driver pushes [`WaveSynth::output`]
//! to chip memory whenever [`WaveSynth::tick`] returns `true`.

use std::sync::Arc;

use crate::song::{Instrument, Song, WaveSynthEffect, WaveSynthParams};

const DEFAULT_WIDTH: usize = 32;
const DEFAULT_HEIGHT: i32 = 255;

/// Number of steps a fade takes from wave 1 to wave 2.
const FADE_STEPS: i32 = 32;

/// Wavetable synthesizer state for one channel
#[derive(Debug, Clone)]
pub struct WaveSynth {
    song: Arc<Song>,
    params: WaveSynthParams,
    width: usize,
    height: i32,
    output: Vec<i32>,
    wave1: Vec<i32>,
    wave2: Vec<i32>,
    pos: usize,
    sub_pos: u8,
    stage: i32,
    first: bool,
    active_changed: bool,
    done: bool,
}

impl WaveSynth {
    /// Create a synth reading wavetables from `song`.
    pub fn new(song: Arc<Song>) -> Self {
        Self {
            song,
            params: WaveSynthParams::default(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            output: vec![0; DEFAULT_WIDTH],
            wave1: vec![0; DEFAULT_WIDTH],
            wave2: vec![0; DEFAULT_WIDTH],
            pos: 0,
            sub_pos: 0,
            stage: 0,
            first: false,
            active_changed: false,
            done: false,
        }
    }

    /// Swap the song wavetables are read from.
    pub fn set_song(&mut self, song: Arc<Song>) {
        self.song = song;
    }

    /// Prepare for a note of `instrument` at `width` × `height` resolution.
    ///
    /// Synth state is only rebuilt when `instrument_changed` is set or the
    /// instrument's synth is not global.
    pub fn init(
        &mut self,
        instrument: Option<&Instrument>,
        width: usize,
        height: i32,
        instrument_changed: bool,
    ) {
        let was_enabled = self.params.enabled;
        let width = width.max(1);
        if width != self.width {
            self.width = width;
            self.output.resize(width, 0);
            self.wave1.resize(width, 0);
            self.wave2.resize(width, 0);
        }
        self.height = height;

        match instrument {
            Some(ins) if ins.wave_synth.enabled => {
                if instrument_changed || !self.params.global || !self.params.enabled {
                    self.params = ins.wave_synth.clone();
                    self.wave1 = self.render(self.params.wave1);
                    self.wave2 = self.render(self.params.wave2);
                    self.restart();
                }
            }
            _ => self.params = WaveSynthParams::default(),
        }

        if was_enabled != self.params.enabled {
            self.active_changed = true;
        }
    }

    /// Select the primary wavetable.
    pub fn change_wave1(&mut self, index: usize) {
        self.wave1 = self.render(index);
        self.restart();
    }

    /// Advance one tick. Returns `true` when [`output`](Self::output) must be re-uploaded.
    pub fn tick(&mut self) -> bool {
        let mut updated = std::mem::take(&mut self.first);
        if self.params.enabled && !self.done {
            self.sub_pos += 1;
            if self.sub_pos >= self.params.speed.max(1) {
                self.sub_pos = 0;
                updated |= self.step();
            }
        }
        updated
    }

    /// Returns `true` once after the synth was switched on or off.
    pub fn active_changed(&mut self) -> bool {
        std::mem::take(&mut self.active_changed)
    }

    /// Current waveform, `width` samples in `0..=height`.
    pub fn output(&self) -> &[i32] {
        &self.output
    }

    /// Whether a synth effect is running.
    pub fn is_enabled(&self) -> bool {
        self.params.enabled
    }

    /// Waveform width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Largest sample value.
    pub fn height(&self) -> i32 {
        self.height
    }

    fn render(&self, index: usize) -> Vec<i32> {
        self.song
            .wavetable(index)
            .map(|wave| wave.render(self.width, self.height))
            .unwrap_or_else(|| vec![0; self.width])
    }

    fn restart(&mut self) {
        self.output.clone_from(&self.wave1);
        self.pos = 0;
        self.sub_pos = 0;
        self.stage = 0;
        self.done = false;
        self.first = true;
    }

    fn advance(&mut self) {
        self.pos = (self.pos + 1) % self.width;
        if self.pos == 0 && self.params.one_shot {
            self.done = true;
        }
    }

    fn step(&mut self) -> bool {
        let amount = self.params.amount as i32;
        let span = self.height + 1;
        let pos = self.pos;

        match self.params.effect {
            WaveSynthEffect::None => return false,
            WaveSynthEffect::Invert => {
                self.output[pos] = self.height - self.output[pos];
                self.advance();
            }
            WaveSynthEffect::Add => {
                self.output[pos] = (self.output[pos] + amount).rem_euclid(span);
                self.advance();
            }
            WaveSynthEffect::Subtract => {
                self.output[pos] = (self.output[pos] - amount).rem_euclid(span);
                self.advance();
            }
            WaveSynthEffect::Average => {
                let next = self.output[(pos + 1) % self.width];
                let weight = amount.clamp(0, 255);
                self.output[pos] = (self.output[pos] * (256 - weight) + next * weight) >> 8;
                self.advance();
            }
            WaveSynthEffect::Phase => {
                self.pos = (self.pos + amount.max(1) as usize) % self.width;
                for (i, out) in self.output.iter_mut().enumerate() {
                    *out = self.wave1[(i + self.pos) % self.width];
                }
            }
            WaveSynthEffect::Wipe => {
                self.output[pos] = self.wave2[pos];
                self.pos += 1;
                if self.pos >= self.width {
                    self.pos = 0;
                    if self.params.one_shot {
                        self.done = true;
                    } else {
                        std::mem::swap(&mut self.wave1, &mut self.wave2);
                    }
                }
            }
            WaveSynthEffect::Fade => {
                self.stage = (self.stage + amount.max(1)).min(FADE_STEPS);
                for (i, out) in self.output.iter_mut().enumerate() {
                    let (a, b) = (self.wave1[i], self.wave2[i]);
                    *out = a + (b - a) * self.stage / FADE_STEPS;
                }
                if self.stage == FADE_STEPS {
                    self.stage = 0;
                    if self.params.one_shot {
                        self.done = true;
                    } else {
                        std::mem::swap(&mut self.wave1, &mut self.wave2);
                    }
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::Wavetable;

    fn song_with_waves() -> Arc<Song> {
        Arc::new(Song {
            wavetables: vec![
                Wavetable::new(vec![0; 32], 255),
                Wavetable::new(vec![255; 32], 255),
                Wavetable::new((0..32).collect::<Vec<_>>(), 31),
            ],
            ..Song::default()
        })
    }

    fn synth_instrument(effect: WaveSynthEffect, one_shot: bool) -> Instrument {
        Instrument {
            wave_synth: WaveSynthParams {
                enabled: true,
                wave1: 0,
                wave2: 1,
                effect,
                one_shot,
                ..WaveSynthParams::default()
            },
            ..Instrument::default()
        }
    }

    #[test]
    fn wave_change_reports_update_once() {
        let mut ws = WaveSynth::new(song_with_waves());
        ws.init(None, 32, 255, false);
        ws.change_wave1(2);
        assert!(ws.tick());
        assert!(!ws.tick());
        assert_eq!(ws.output()[31], 255);
        assert_eq!(ws.output()[0], 0);
    }

    #[test]
    fn missing_wavetable_renders_flat() {
        let mut ws = WaveSynth::new(Arc::new(Song::default()));
        ws.change_wave1(7);
        assert!(ws.tick());
        assert!(ws.output().iter().all(|&s| s == 0));
    }

    #[test]
    fn one_shot_wipe_ends_on_wave2() {
        let mut ws = WaveSynth::new(song_with_waves());
        ws.init(Some(&synth_instrument(WaveSynthEffect::Wipe, true)), 32, 255, true);
        for _ in 0..32 {
            assert!(ws.tick());
        }
        assert!(ws.output().iter().all(|&s| s == 255));
        assert!(!ws.tick());
    }

    #[test]
    fn fade_reaches_wave2() {
        let mut ws = WaveSynth::new(song_with_waves());
        ws.init(Some(&synth_instrument(WaveSynthEffect::Fade, true)), 32, 255, true);
        for _ in 0..FADE_STEPS {
            ws.tick();
        }
        assert!(ws.output().iter().all(|&s| s == 255));
    }

    #[test]
    fn toggling_synth_flags_active_change() {
        let mut ws = WaveSynth::new(song_with_waves());
        assert!(!ws.active_changed());
        ws.init(Some(&synth_instrument(WaveSynthEffect::Invert, false)), 32, 255, true);
        assert!(ws.active_changed());
        assert!(!ws.active_changed());
        ws.init(None, 32, 255, false);
        assert!(ws.active_changed());
    }

    #[test]
    fn global_synth_survives_same_instrument_notes() {
        let mut ins = synth_instrument(WaveSynthEffect::Add, false);
        ins.wave_synth.global = true;
        let mut ws = WaveSynth::new(song_with_waves());
        ws.init(Some(&ins), 32, 255, true);
        ws.tick();
        ws.tick();
        let evolved = ws.output().to_vec();
        ws.init(Some(&ins), 32, 255, false);
        assert_eq!(ws.output(), evolved.as_slice());
        ws.init(Some(&ins), 32, 255, true);
        assert!(ws.output().iter().all(|&s| s == 0));
    }

    #[test]
    fn add_wraps_within_height() {
        let mut ins = synth_instrument(WaveSynthEffect::Add, false);
        ins.wave_synth.wave1 = 1;
        ins.wave_synth.amount = 3;
        let mut ws = WaveSynth::new(song_with_waves());
        ws.init(Some(&ins), 32, 255, true);
        ws.tick();
        assert_eq!(ws.output()[0], 2);
    }
}
