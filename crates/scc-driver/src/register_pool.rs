//! Register pool and the single write path to the chip
//!
//! Every register write the driver makes goes through [`ChipBus::write`],
//! which forwards it to the chip core, mirrors it into the [`RegisterPool`]
//! and, in dump mode, appends it to the [`WriteLog`]. While writes are
//! suppressed (seeking, fast-forward) none of the three happen.
//! [`ChipBus::poke`] performs the same three steps but ignores suppression.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use scc_core::SccBackend;

/// Size of the register pool in bytes (addresses `0..=224`).
pub const REGISTER_POOL_SIZE: usize = 225;

/// Address of the write log entry that marks a frame boundary.
pub const LOG_BOUNDARY: u32 = 0xffff_ffff;

bitflags! {
    /// Channel enable register (`base + 15`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EnableMask: u8 {
        /// Channel 1 output enable
        const CH1 = 0x01;
        /// Channel 2 output enable
        const CH2 = 0x02;
        /// Channel 3 output enable
        const CH3 = 0x04;
        /// Channel 4 output enable
        const CH4 = 0x08;
        /// Channel 5 output enable
        const CH5 = 0x10;
    }
}

impl EnableMask {
    /// Bit of channel `ch` (0-based).
    pub fn channel(ch: usize) -> Self {
        Self::from_bits_retain(1 << ch)
    }
}

/// One register write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegWrite {
    /// Register address, or [`LOG_BOUNDARY`].
    pub addr: u32,
    /// Value written.
    pub val: u16,
}

impl RegWrite {
    /// Create a write.
    pub const fn new(addr: u32, val: u16) -> Self {
        Self { addr, val }
    }

    /// Whether this entry is a frame boundary marker.
    pub fn is_boundary(&self) -> bool {
        self.addr == LOG_BOUNDARY
    }
}

/// Last value written to each register address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterPool {
    regs: [u8; REGISTER_POOL_SIZE],
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self {
            regs: [0; REGISTER_POOL_SIZE],
        }
    }
}

impl RegisterPool {
    /// Zero every register.
    pub fn clear(&mut self) {
        self.regs.fill(0);
    }

    /// Value at `addr`, 0 outside the pool.
    pub fn get(&self, addr: u32) -> u8 {
        self.regs.get(addr as usize).copied().unwrap_or(0)
    }

    /// Store `value` at `addr`; addresses outside the pool are dropped.
    pub(crate) fn store(&mut self, addr: u32, value: u8) {
        if let Some(reg) = self.regs.get_mut(addr as usize) {
            *reg = value;
        }
    }

    /// Raw pool contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.regs
    }
}

/// Ordered record of applied writes, with frame boundary markers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteLog {
    entries: Vec<RegWrite>,
}

impl WriteLog {
    /// Append a write.
    pub fn push(&mut self, write: RegWrite) {
        self.entries.push(write);
    }

    /// Append a frame boundary marker.
    pub fn mark_boundary(&mut self) {
        self.entries.push(RegWrite::new(LOG_BOUNDARY, 0));
    }

    /// Recorded entries.
    pub fn entries(&self) -> &[RegWrite] {
        &self.entries
    }

    /// Remove and return all entries.
    pub fn take(&mut self) -> Vec<RegWrite> {
        std::mem::take(&mut self.entries)
    }

    /// Number of recorded entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Chip core plus its register mirror and write log
pub struct ChipBus {
    core: Option<Box<dyn SccBackend>>,
    pool: RegisterPool,
    log: WriteLog,
    skip: bool,
    dump: bool,
}

impl ChipBus {
    /// Wrap a chip core.
    pub fn new(core: Box<dyn SccBackend>) -> Self {
        Self {
            core: Some(core),
            pool: RegisterPool::default(),
            log: WriteLog::default(),
            skip: false,
            dump: false,
        }
    }

    /// Apply a write unless writes are suppressed.
    #[inline]
    pub fn write(&mut self, addr: u32, value: u16) {
        if !self.skip {
            self.apply(addr, value);
        }
    }

    /// Apply a write even while writes are suppressed.
    pub fn poke(&mut self, addr: u32, value: u16) {
        self.apply(addr, value);
    }

    fn apply(&mut self, addr: u32, value: u16) {
        log::trace!("scc write {addr:#04x} <- {value:#04x}");
        if let (Some(core), Ok(reg)) = (self.core.as_mut(), u8::try_from(addr)) {
            core.write(reg, value as u8);
        }
        self.pool.store(addr, value as u8);
        if self.dump {
            self.log.push(RegWrite::new(addr, value));
        }
    }

    /// Set or clear one channel's bit in the enable register at `addr`,
    /// keeping every other bit as last written.
    pub fn set_enable(&mut self, addr: u32, ch: usize, on: bool) {
        let mut mask = EnableMask::from_bits_retain(self.pool.get(addr));
        mask.set(EnableMask::channel(ch), on);
        self.write(addr, mask.bits() as u16);
    }

    /// Suppress or allow writes.
    pub fn set_skip(&mut self, skip: bool) {
        self.skip = skip;
    }

    /// Whether writes are suppressed.
    pub fn is_skipping(&self) -> bool {
        self.skip
    }

    /// Enable or disable the write log.
    pub fn set_dump(&mut self, dump: bool) {
        self.dump = dump;
    }

    /// Whether the write log is recording.
    pub fn is_dumping(&self) -> bool {
        self.dump
    }

    /// Register mirror.
    pub fn pool(&self) -> &RegisterPool {
        &self.pool
    }

    /// Write log.
    pub fn log(&self) -> &WriteLog {
        &self.log
    }

    pub(crate) fn pool_mut(&mut self) -> &mut RegisterPool {
        &mut self.pool
    }

    pub(crate) fn log_mut(&mut self) -> &mut WriteLog {
        &mut self.log
    }

    /// Chip core, until it is released.
    pub fn core(&self) -> Option<&dyn SccBackend> {
        self.core.as_deref()
    }

    pub(crate) fn core_mut(&mut self) -> Option<&mut (dyn SccBackend + 'static)> {
        self.core.as_deref_mut()
    }

    /// Drop the chip core. Later writes still reach the pool and the log.
    pub(crate) fn release_core(&mut self) {
        self.core = None;
    }
}

impl std::fmt::Debug for ChipBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChipBus")
            .field("model", &self.core.as_ref().map(|c| c.model()))
            .field("skip", &self.skip)
            .field("dump", &self.dump)
            .field("logged", &self.log.len())
            .finish()
    }
}
