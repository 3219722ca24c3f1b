//! Driver configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use scc_core::ChipModel;

use crate::error::Result;

/// Settings fixed when a driver is created
///
/// ```
/// use scc_core::ChipModel;
/// use scc_driver::DriverConfig;
///
/// let config = DriverConfig::default()
///     .with_model(ChipModel::SccPlus)
///     .with_dump_writes(true);
/// assert!(config.dump_writes);
///
/// let parsed = DriverConfig::from_json(r#"{"model": "scc-plus", "dump_writes": true}"#).unwrap();
/// assert_eq!(parsed, config);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Chip variant to drive.
    pub model: ChipModel,
    /// Record every applied register write.
    pub dump_writes: bool,
    /// Start with register writes suppressed.
    pub skip_register_writes: bool,
}

impl DriverConfig {
    /// Select the chip variant.
    pub fn with_model(mut self, model: ChipModel) -> Self {
        self.model = model;
        self
    }

    /// Enable or disable the write log.
    pub fn with_dump_writes(mut self, dump_writes: bool) -> Self {
        self.dump_writes = dump_writes;
        self
    }

    /// Start with register writes suppressed.
    pub fn with_skip_register_writes(mut self, skip: bool) -> Self {
        self.skip_register_writes = skip;
        self
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
