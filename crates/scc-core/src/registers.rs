//! SCC Register Definitions
//!
//! Both variants share the same control block layout relative to a register
//! base; only the base and the waveform area differ.

use std::fmt;

/// Offset of the first frequency register from the register base.
/// Channel `n` uses `REG_FREQ + 2n` (low byte) and `REG_FREQ + 2n + 1` (high nibble).
pub const REG_FREQ: u8 = 0x00;

/// Offset of the first volume register from the register base.
pub const REG_VOLUME: u8 = 0x0a;

/// Offset of the channel enable mask from the register base.
pub const REG_ENABLE: u8 = 0x0f;

/// One entry of a register sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterName {
    /// Human-readable register name
    pub name: &'static str,
    /// Register address
    pub addr: u8,
}

impl RegisterName {
    const fn new(name: &'static str, addr: u8) -> Self {
        Self { name, addr }
    }
}

impl fmt::Display for RegisterName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:02x})", self.name, self.addr)
    }
}

/// Register sheet of the K051649 (SCC)
pub const SCC_REGISTER_SHEET: &[RegisterName] = &[
    RegisterName::new("Ch1_Wave", 0x00),
    RegisterName::new("Ch2_Wave", 0x20),
    RegisterName::new("Ch3_Wave", 0x40),
    RegisterName::new("Ch4_5_Wave", 0x60),
    RegisterName::new("Ch1_FreqL", 0x80),
    RegisterName::new("Ch1_FreqH", 0x81),
    RegisterName::new("Ch2_FreqL", 0x82),
    RegisterName::new("Ch2_FreqH", 0x83),
    RegisterName::new("Ch3_FreqL", 0x84),
    RegisterName::new("Ch3_FreqH", 0x85),
    RegisterName::new("Ch4_FreqL", 0x86),
    RegisterName::new("Ch4_FreqH", 0x87),
    RegisterName::new("Ch5_FreqL", 0x88),
    RegisterName::new("Ch5_FreqH", 0x89),
    RegisterName::new("Ch1_Vol", 0x8a),
    RegisterName::new("Ch2_Vol", 0x8b),
    RegisterName::new("Ch3_Vol", 0x8c),
    RegisterName::new("Ch4_Vol", 0x8d),
    RegisterName::new("Ch5_Vol", 0x8e),
    RegisterName::new("Output", 0x8f),
    RegisterName::new("Test", 0xe0),
];

/// Register sheet of the K052539 (SCC+)
pub const SCC_PLUS_REGISTER_SHEET: &[RegisterName] = &[
    RegisterName::new("Ch1_Wave", 0x00),
    RegisterName::new("Ch2_Wave", 0x20),
    RegisterName::new("Ch3_Wave", 0x40),
    RegisterName::new("Ch4_Wave", 0x60),
    RegisterName::new("Ch5_Wave", 0x80),
    RegisterName::new("Ch1_FreqL", 0xa0),
    RegisterName::new("Ch1_FreqH", 0xa1),
    RegisterName::new("Ch2_FreqL", 0xa2),
    RegisterName::new("Ch2_FreqH", 0xa3),
    RegisterName::new("Ch3_FreqL", 0xa4),
    RegisterName::new("Ch3_FreqH", 0xa5),
    RegisterName::new("Ch4_FreqL", 0xa6),
    RegisterName::new("Ch4_FreqH", 0xa7),
    RegisterName::new("Ch5_FreqL", 0xa8),
    RegisterName::new("Ch5_FreqH", 0xa9),
    RegisterName::new("Ch1_Vol", 0xaa),
    RegisterName::new("Ch2_Vol", 0xab),
    RegisterName::new("Ch3_Vol", 0xac),
    RegisterName::new("Ch4_Vol", 0xad),
    RegisterName::new("Ch5_Vol", 0xae),
    RegisterName::new("Output", 0xaf),
    RegisterName::new("Test", 0xc0),
];

/// Look up a register address by name in a sheet
pub fn find_register(sheet: &[RegisterName], name: &str) -> Option<u8> {
    sheet.iter().find(|r| r.name == name).map(|r| r.addr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_agree_on_control_block_layout() {
        for (sheet, base) in [(SCC_REGISTER_SHEET, 0x80u8), (SCC_PLUS_REGISTER_SHEET, 0xa0u8)] {
            assert_eq!(find_register(sheet, "Ch1_FreqL"), Some(base + REG_FREQ));
            assert_eq!(find_register(sheet, "Ch5_FreqH"), Some(base + REG_FREQ + 9));
            assert_eq!(find_register(sheet, "Ch1_Vol"), Some(base + REG_VOLUME));
            assert_eq!(find_register(sheet, "Output"), Some(base + REG_ENABLE));
        }
    }

    #[test]
    fn standard_sheet_shares_last_wave_window() {
        assert_eq!(find_register(SCC_REGISTER_SHEET, "Ch4_5_Wave"), Some(0x60));
        assert_eq!(find_register(SCC_REGISTER_SHEET, "Ch5_Wave"), None);
        assert_eq!(find_register(SCC_PLUS_REGISTER_SHEET, "Ch5_Wave"), Some(0x80));
    }
}
