//! Note to period conversion and the shared frequency calculator
//!
//! SCC voices are period-driven: a larger register value is a lower pitch.
//! Drivers work on a "base" period derived from the note and bend it with the
//! effect pitch and the macro pitch right before writing the registers.

/// Semitones per octave.
const NOTES_IN_OCTAVE: f64 = 12.0;

/// Linear pitch units per octave (128 per semitone).
const LINEAR_UNITS_PER_OCTAVE: f64 = 1536.0;

/// Frequency of `note` in Hz. Note 45 sounds at `tuning`.
pub fn note_frequency_hz(note: i32, tuning: f64) -> f64 {
    (tuning / 16.0) * 2f64.powf((note as f64 + 3.0) / NOTES_IN_OCTAVE)
}

/// Period register value that makes a `clock / divider` counter play `note`.
pub fn note_period(note: i32, clock: u32, divider: u32, tuning: f64) -> i32 {
    let hz = note_frequency_hz(note, tuning);
    let period = clock as f64 / hz / divider as f64;
    period.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32
}

/// Final period from a base period and two pitch offsets.
///
/// Legacy mode subtracts the offsets from the period. Linear mode treats them
/// as 1/128 semitone steps, so the same offset bends every note equally.
/// Results outside the `i32` range saturate.
pub fn calc_freq(base: i32, pitch: i32, pitch2: i32, linear: bool) -> i32 {
    if linear {
        let bend = -(pitch as f64 + pitch2 as f64) / LINEAR_UNITS_PER_OCTAVE;
        // float to int casts saturate
        (base as f64 * 2f64.powf(bend)).round() as i32
    } else {
        let freq = base as i64 - pitch as i64 - pitch2 as i64;
        freq.clamp(i32::MIN as i64, i32::MAX as i64) as i32
    }
}

/// Clock and tuning settings needed to turn notes into periods
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchContext {
    /// Chip clock in Hz.
    pub clock: u32,
    /// Clock divider between the chip clock and the period counter.
    pub divider: u32,
    /// Frequency of note 45 in Hz.
    pub tuning: f64,
    /// Use linear pitch offsets.
    pub linear: bool,
}

impl PitchContext {
    /// Create a context in legacy pitch mode.
    pub fn new(clock: u32, divider: u32, tuning: f64) -> Self {
        Self {
            clock,
            divider,
            tuning,
            linear: false,
        }
    }

    /// Switch between linear and legacy pitch offsets.
    pub fn with_linear(mut self, linear: bool) -> Self {
        self.linear = linear;
        self
    }

    /// Period of `note`, rounded to the nearest integer.
    pub fn note_period(&self, note: i32) -> i32 {
        note_period(note, self.clock, self.divider, self.tuning)
    }

    /// Final period for `base` bent by `pitch` and `pitch2`.
    pub fn calc_freq(&self, base: i32, pitch: i32, pitch2: i32) -> i32 {
        calc_freq(base, pitch, pitch2, self.linear)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn tuning_note_and_octaves() {
        assert_relative_eq!(note_frequency_hz(45, 440.0), 440.0, epsilon = 1e-9);
        assert_relative_eq!(note_frequency_hz(57, 440.0), 880.0, epsilon = 1e-9);
        assert_relative_eq!(note_frequency_hz(33, 432.0), 216.0, epsilon = 1e-9);
    }

    #[test]
    fn higher_notes_have_shorter_periods() {
        let ctx = PitchContext::new(3_579_545, 32, 440.0);
        let a4 = ctx.note_period(45);
        assert_eq!(a4, (3_579_545.0f64 / 440.0 / 32.0).round() as i32);
        assert!(ctx.note_period(46) < a4);
        assert!((ctx.note_period(57) - a4 / 2).abs() <= 1);
    }

    #[test]
    fn legacy_offsets_subtract() {
        assert_eq!(calc_freq(500, 10, 5, false), 485);
        assert_eq!(calc_freq(500, -10, 0, false), 510);
    }

    #[test]
    fn linear_offsets_scale_by_octave() {
        assert_eq!(calc_freq(1000, 1536, 0, true), 500);
        assert_eq!(calc_freq(1000, 0, -1536, true), 2000);
        assert_eq!(calc_freq(1000, 768, 768, true), 500);
        let ctx = PitchContext::new(3_579_545, 32, 440.0).with_linear(true);
        assert_eq!(ctx.calc_freq(1000, 0, 0), 1000);
    }

    #[test]
    fn extreme_offsets_saturate() {
        assert_eq!(calc_freq(500, i32::MIN, 0, false), i32::MAX);
        assert_eq!(calc_freq(500, i32::MAX, i32::MAX, false), i32::MIN);
        assert_eq!(calc_freq(500, i32::MIN, i32::MIN, true), i32::MAX);
        assert_eq!(calc_freq(500, i32::MAX, i32::MAX, true), 0);
    }
}
