//! Konami SCC wavetable sound chip cores
//!
//! Emulation of the two SCC variants found in MSX cartridges:
//!
//! - **K051649** ("SCC"): five voices, but voices 4 and 5 share a single
//!   32-byte waveform window.
//! - **K052539** ("SCC+"): five voices, each with its own waveform window,
//!   and the control registers moved up by 0x20.
//!
//! Both cores run one internal step per call to [`SccBackend::tick`] and expose
//! the summed output as well as each voice's raw output for visualization.
//!
//! # Backend Trait
//! The [`SccBackend`] trait is the seam between a driver and a chip core. It
//! carries the variant-specific address layout (register base, waveform window
//! aliasing, register sheet) so callers select a variant once, through
//! [`ChipModel::create_backend`], and never branch on the model afterwards.
//!
//! # Quick start
//! ```
//! use scc_core::{ChipModel, SccBackend};
//!
//! let mut chip = ChipModel::Scc.create_backend();
//! let base = chip.register_base();
//! for i in 0..32u8 {
//!     chip.write(i, if i < 16 { 0x7f } else { 0x80 }); // square wave, voice 1
//! }
//! chip.write(base, 0xfe); // period low
//! chip.write(base + 1, 0x00); // period high
//! chip.write(base + 10, 0x0f); // volume
//! chip.write(base + 15, 0x01); // enable voice 1
//! chip.tick();
//! let _sample = chip.out();
//! ```

#![warn(missing_docs)]

pub mod backend;
pub mod k051649;
pub mod k052539;
pub mod model;
pub mod registers;
mod voice;

pub use backend::SccBackend;
pub use k051649::K051649;
pub use k052539::K052539;
pub use model::{ChipModel, ChipModelError};
pub use registers::{RegisterName, REG_ENABLE, REG_FREQ, REG_VOLUME};

/// Number of voices on either SCC variant.
pub const VOICE_COUNT: usize = 5;

/// Length of a voice's waveform, in samples.
pub const WAVE_LENGTH: usize = 32;
