//! Song, instrument and wavetable model.
//!
//! Only the parts a wavetable driver consumes are modelled: instrument macros,
//! wave synthesizer settings, wavetables and the compatibility flags that
//! change driver behaviour. Songs deserialize from JSON.

use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::DEFAULT_TUNING;

/// Result type for song operations.
pub type Result<T> = std::result::Result<T, SongError>;

/// Errors that can occur when loading a song.
#[derive(Error, Debug)]
pub enum SongError {
    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structurally valid data that breaks a model rule.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

/// How a macro's values combine with the channel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MacroMode {
    /// Values are offsets (arpeggio: semitones from the note, pitch: added to the bend).
    #[default]
    Relative,
    /// Values replace the target (arpeggio: fixed note, pitch: bend value).
    Absolute,
}

/// One instrument macro: a value sequence with optional loop and release points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroData {
    /// Step values.
    pub values: Vec<i32>,
    /// Step to jump back to at the end (or at the release point while held).
    pub loop_point: Option<usize>,
    /// Step the macro holds at until the note is released.
    pub release_point: Option<usize>,
    /// Relative/absolute interpretation.
    pub mode: MacroMode,
}

impl MacroData {
    /// Build a one-shot macro from values.
    pub fn from_values(values: impl Into<Vec<i32>>) -> Self {
        Self {
            values: values.into(),
            ..Self::default()
        }
    }

    /// Set the loop point.
    pub fn looped(mut self, loop_point: usize) -> Self {
        self.loop_point = Some(loop_point);
        self
    }

    /// Set the release point.
    pub fn released_at(mut self, release_point: usize) -> Self {
        self.release_point = Some(release_point);
        self
    }

    /// Set the mode.
    pub fn with_mode(mut self, mode: MacroMode) -> Self {
        self.mode = mode;
        self
    }

    /// Whether the macro has no steps.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.values.len()
    }
}

/// The macros an SCC instrument can carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstrumentMacros {
    /// Volume scale, 0-15.
    pub vol: MacroData,
    /// Arpeggio in semitones (relative) or notes (absolute).
    pub arp: MacroData,
    /// Wavetable index.
    pub wave: MacroData,
    /// Pitch bend.
    pub pitch: MacroData,
}

/// Wave synthesizer effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WaveSynthEffect {
    /// Play wave 1 unchanged.
    #[default]
    None,
    /// Invert one sample per step.
    Invert,
    /// Add `amount` to one sample per step, wrapping.
    Add,
    /// Subtract `amount` from one sample per step, wrapping.
    Subtract,
    /// Blend one sample per step with its neighbour.
    Average,
    /// Rotate wave 1 by `amount` samples per step.
    Phase,
    /// Replace wave 1 with wave 2 one sample per step.
    Wipe,
    /// Crossfade from wave 1 to wave 2.
    Fade,
}

/// Per-instrument wave synthesizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSynthParams {
    /// Run the synthesizer instead of playing the channel's wavetable as-is.
    pub enabled: bool,
    /// Keep synth state across notes of the same instrument.
    pub global: bool,
    /// First wavetable.
    pub wave1: usize,
    /// Second wavetable (dual effects).
    pub wave2: usize,
    /// Effect to run.
    pub effect: WaveSynthEffect,
    /// Ticks per synth step (0 behaves as 1).
    pub speed: u8,
    /// Effect amount.
    pub amount: u8,
    /// Stop after one pass instead of repeating.
    pub one_shot: bool,
}

impl Default for WaveSynthParams {
    fn default() -> Self {
        Self {
            enabled: false,
            global: false,
            wave1: 0,
            wave2: 0,
            effect: WaveSynthEffect::None,
            speed: 1,
            amount: 1,
            one_shot: false,
        }
    }
}

/// An SCC instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instrument {
    /// Display name.
    pub name: String,
    /// Macros.
    pub macros: InstrumentMacros,
    /// Wave synthesizer settings.
    pub wave_synth: WaveSynthParams,
}

impl Instrument {
    /// Create an empty instrument with a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// A wavetable: arbitrary length, values in `0..=max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wavetable {
    /// Samples.
    pub data: Vec<i32>,
    /// Largest representable sample value.
    pub max: i32,
}

impl Wavetable {
    /// Create a wavetable.
    pub fn new(data: impl Into<Vec<i32>>, max: i32) -> Self {
        Self {
            data: data.into(),
            max,
        }
    }

    /// Resample to `width` samples and rescale to `0..=height`.
    pub fn render(&self, width: usize, height: i32) -> Vec<i32> {
        if self.data.is_empty() || self.max <= 0 {
            return vec![0; width];
        }
        (0..width)
            .map(|i| {
                let src = self.data[i * self.data.len() / width].clamp(0, self.max);
                (src as i64 * height as i64 / self.max as i64) as i32
            })
            .collect()
    }
}

/// Song-level switches that change driver behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompatFlags {
    /// Restart macros when a portamento starts on a sounding note.
    pub reset_macro_on_porta: bool,
    /// Pitch values are 1/128 semitone steps instead of raw period offsets.
    pub linear_pitch: bool,
    /// Frequency of note 45 in Hz.
    pub tuning: f64,
}

impl Default for CompatFlags {
    fn default() -> Self {
        Self {
            reset_macro_on_porta: false,
            linear_pitch: false,
            tuning: DEFAULT_TUNING,
        }
    }
}

/// Instruments, wavetables and flags of a song.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Song {
    /// Instruments, referenced by index.
    pub instruments: Vec<Arc<Instrument>>,
    /// Wavetables, referenced by index.
    pub wavetables: Vec<Wavetable>,
    /// Compatibility flags.
    pub compat: CompatFlags,
}

impl Song {
    /// Parse a song from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let song: Song = serde_json::from_str(json)?;
        song.validate()?;
        Ok(song)
    }

    /// Load a song from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Check model rules serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if !(self.compat.tuning.is_finite() && self.compat.tuning > 0.0) {
            return Err(SongError::InvalidValue {
                field: "compat.tuning".to_string(),
                reason: format!("{} is not a positive frequency", self.compat.tuning),
            });
        }
        for (i, wave) in self.wavetables.iter().enumerate() {
            if wave.max <= 0 {
                return Err(SongError::InvalidValue {
                    field: format!("wavetables[{i}].max"),
                    reason: "must be greater than zero".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Instrument at `index`, if any.
    pub fn instrument(&self, index: usize) -> Option<Arc<Instrument>> {
        self.instruments.get(index).cloned()
    }

    /// Wavetable at `index`, if any.
    pub fn wavetable(&self, index: usize) -> Option<&Wavetable> {
        self.wavetables.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_song() {
        let song = Song::from_json(
            r#"{
                "instruments": [{"name": "lead", "macros": {"vol": {"values": [15, 12, 8]}}}],
                "wavetables": [{"data": [0, 15, 31], "max": 31}]
            }"#,
        )
        .unwrap();
        assert_eq!(song.instruments[0].macros.vol.values, vec![15, 12, 8]);
        assert!(song.instruments[0].macros.arp.is_empty());
        assert_eq!(song.compat.tuning, DEFAULT_TUNING);
        assert!(song.instrument(1).is_none());
    }

    #[test]
    fn rejects_bad_wavetable_range() {
        let err = Song::from_json(r#"{"wavetables": [{"data": [1], "max": 0}]}"#).unwrap_err();
        assert!(matches!(err, SongError::InvalidValue { .. }));
    }

    #[test]
    fn render_rescales_to_height() {
        let wave = Wavetable::new(vec![0, 31], 31);
        let out = wave.render(4, 255);
        assert_eq!(out, vec![0, 0, 255, 255]);
    }

    #[test]
    fn render_of_empty_table_is_flat() {
        let wave = Wavetable::new(Vec::new(), 15);
        assert_eq!(wave.render(32, 255), vec![0; 32]);
    }

    #[test]
    fn huge_wavetable_range_renders_without_overflow() {
        let wave = Wavetable::new(vec![100_000_000; 32], 100_000_000);
        let song = Song {
            wavetables: vec![wave.clone()],
            ..Song::default()
        };
        song.validate().unwrap();
        assert_eq!(wave.render(32, 255), vec![255; 32]);
        let half = Wavetable::new(vec![0, i32::MAX / 2, i32::MAX], i32::MAX);
        assert_eq!(half.render(3, 255), vec![0, 127, 255]);
    }
}
