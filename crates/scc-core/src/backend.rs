//! Backend trait abstraction for SCC chip implementations
//!
//! This module defines the interface a driver talks to. Besides register
//! access and stepping, it carries the parts of the address layout that differ
//! between the standard and the extended variant.

use crate::model::ChipModel;
use crate::registers::RegisterName;

/// Common interface for SCC chip backends
///
/// # Example
///
/// ```
/// use scc_core::{ChipModel, SccBackend};
///
/// fn play_voice_one(chip: &mut dyn SccBackend) {
///     let base = chip.register_base();
///     chip.write(base, 0x00); // period low
///     chip.write(base + 1, 0x01); // period high
///     chip.write(base + 10, 0x0f); // volume
///     chip.write(base + 15, 0x01); // enable
///
///     for _ in 0..16 {
///         chip.tick();
///     }
///     let _sample = chip.out();
/// }
///
/// play_voice_one(ChipModel::SccPlus.create_backend().as_mut());
/// ```
pub trait SccBackend: Send {
    /// The chip variant this backend emulates.
    fn model(&self) -> ChipModel;

    /// Reset the backend to its power-on state
    ///
    /// Clears waveform memory, periods, volumes and the enable mask.
    fn reset(&mut self);

    /// Write a byte to the chip's memory-mapped register space
    ///
    /// Addresses that the variant does not decode are ignored.
    fn write(&mut self, addr: u8, value: u8);

    /// Read back the last value written at `addr`
    fn read(&self, addr: u8) -> u8;

    /// Advance the chip by one internal step
    fn tick(&mut self);

    /// Summed output of all voices after the last step
    fn out(&self) -> i32;

    /// Raw output of a single voice after the last step
    ///
    /// Returns 0 for channels outside `0..5`.
    fn chan_out(&self, channel: usize) -> i32;

    /// Waveform memory window that `channel`'s samples must be written to.
    ///
    /// Window `n` starts at address `n * 32`.
    fn wave_window(&self, channel: usize) -> usize;

    /// Address of the first frequency register.
    ///
    /// Frequency pairs follow at `base + 2 * ch`, volumes at `base + 10 + ch`
    /// and the enable mask at `base + 15`.
    fn register_base(&self) -> u8 {
        self.model().register_base()
    }

    /// Name → address table used by debugging and trace tools.
    fn register_sheet(&self) -> &'static [RegisterName] {
        self.model().register_sheet()
    }
}
