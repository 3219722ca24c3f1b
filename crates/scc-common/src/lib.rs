//! Engine-side collaborators for SCC drivers.
//!
//! A chip driver needs more than the chip: it reads instruments and
//! wavetables from the song, runs a macro sequencer and a wave synthesizer per
//! channel, converts notes to periods, and publishes per-channel scope data.
//! This crate provides those pieces.
//!
//! # Modules
//!
//! - [`song`] - song, instrument and wavetable model (serde)
//! - [`macros`] - per-channel macro sequencer
//! - [`wave_synth`] - per-channel wavetable synthesizer
//! - [`pitch`] - note → period conversion and the frequency calculator
//! - [`osc`] - oscilloscope ring buffers
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use scc_common::{MacroSequencer, Song};
//!
//! let song = Arc::new(Song::default());
//! let mut macros = MacroSequencer::new();
//! macros.init(song.instrument(0));
//! macros.next();
//! assert!(!macros.vol.had);
//! ```

#![warn(missing_docs)]

pub mod macros;
pub mod osc;
pub mod pitch;
pub mod song;
pub mod wave_synth;

pub use macros::{MacroKind, MacroSequencer, MacroState};
pub use osc::{OscBuffer, OSC_BUFFER_LEN};
pub use pitch::{calc_freq, note_frequency_hz, note_period, PitchContext};
pub use song::{
    CompatFlags, Instrument, InstrumentMacros, MacroData, MacroMode, Result, Song, SongError,
    WaveSynthEffect, WaveSynthParams, Wavetable,
};
pub use wave_synth::WaveSynth;

// ============================================================================
// Common Constants
// ============================================================================

/// NTSC colour subcarrier clock (315/88 MHz), the SCC's reference clock in Hz.
pub const COLOR_NTSC: u32 = 3_579_545;

/// Chip clock cycles per period counter step.
pub const CHIP_DIVIDER: u32 = 32;

/// Chip clock cycles per internal core step; the native sample rate is `clock / 16`.
pub const SAMPLE_RATE_DIVIDER: u32 = 16;

/// Channels driven by one SCC driver.
pub const CHANNEL_COUNT: usize = 5;

/// NTSC frame rate (60 Hz), the usual tick rate of MSX music drivers.
pub const FRAME_RATE_NTSC: u32 = 60;

/// Standard audio sample rate (44.1 kHz CD quality).
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Default tuning reference in Hz.
pub const DEFAULT_TUNING: f64 = 440.0;
