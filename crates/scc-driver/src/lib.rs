//! Tick-driven driver for the Konami SCC and SCC+
//!
//! [`SccDriver`] sits between a tracker sequencer and an SCC chip core. The
//! sequencer sends [`Command`]s per channel and calls [`SccDriver::tick`] once
//! per song tick; the driver folds note, volume, portamento and instrument
//! macro state into register writes. [`SccDriver::acquire`] then renders the
//! chip at `clock / 16` Hz.
//!
//! All register traffic passes through one write path that mirrors the chip
//! into a 225-byte register pool and, on request, records a write log. Writes
//! can be suppressed while seeking; pokes from debugging tools always apply.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use scc_common::Song;
//! use scc_driver::{Command, DriverConfig, SccDriver};
//!
//! let mut driver = SccDriver::init(Arc::new(Song::default()), DriverConfig::default()).unwrap();
//! driver.dispatch(0, Command::NoteOn { note: Some(60) });
//! driver.tick();
//!
//! let mut left = vec![0i16; 735];
//! let mut right = vec![0i16; 735];
//! driver.acquire(&mut left, &mut right);
//! assert_eq!(driver.register_pool()[0x8f] & 1, 1);
//! ```

#![warn(missing_docs)]

mod channel;
mod command;
pub mod config;
mod dispatch;
mod driver;
pub mod error;
pub mod export;
pub mod register_pool;
mod tick;
mod wave;

pub use channel::{Channel, FREQ_MAX, PITCH2_RANGE, VOLUME_MAX};
pub use command::{effect_name, Command, Response, EFFECT_CHANGE_WAVE};
pub use config::DriverConfig;
pub use driver::SccDriver;
pub use error::{Result, SccError};
pub use export::{export_write_log, read_log_csv, write_log_csv};
pub use register_pool::{
    ChipBus, EnableMask, RegWrite, RegisterPool, WriteLog, LOG_BOUNDARY, REGISTER_POOL_SIZE,
};
