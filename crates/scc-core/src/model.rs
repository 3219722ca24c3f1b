//! Chip variant selection

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::backend::SccBackend;
use crate::k051649::K051649;
use crate::k052539::K052539;
use crate::registers::{RegisterName, SCC_PLUS_REGISTER_SHEET, SCC_REGISTER_SHEET};

/// Error returned when a chip model name cannot be parsed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown SCC chip model '{0}' (expected 'scc' or 'scc-plus')")]
pub struct ChipModelError(pub String);

/// SCC hardware variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChipModel {
    /// K051649, the original SCC. Voices 4 and 5 share waveform memory.
    #[default]
    Scc,
    /// K052539, the SCC+ with independent waveform memory per voice.
    SccPlus,
}

impl ChipModel {
    /// Address of the first frequency register for this variant.
    pub fn register_base(self) -> u8 {
        match self {
            ChipModel::Scc => 0x80,
            ChipModel::SccPlus => 0xa0,
        }
    }

    /// Register sheet for this variant.
    pub fn register_sheet(self) -> &'static [RegisterName] {
        match self {
            ChipModel::Scc => SCC_REGISTER_SHEET,
            ChipModel::SccPlus => SCC_PLUS_REGISTER_SHEET,
        }
    }

    /// Build the chip core for this variant.
    pub fn create_backend(self) -> Box<dyn SccBackend> {
        match self {
            ChipModel::Scc => Box::new(K051649::new()),
            ChipModel::SccPlus => Box::new(K052539::new()),
        }
    }

    /// Get string representation of the model.
    pub fn as_str(self) -> &'static str {
        match self {
            ChipModel::Scc => "scc",
            ChipModel::SccPlus => "scc-plus",
        }
    }
}

impl fmt::Display for ChipModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChipModel {
    type Err = ChipModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "scc" | "k051649" => Ok(ChipModel::Scc),
            "scc-plus" | "scc+" | "sccplus" | "k052539" => Ok(ChipModel::SccPlus),
            _ => Err(ChipModelError(value.to_string())),
        }
    }
}
