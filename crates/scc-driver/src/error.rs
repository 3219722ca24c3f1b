//! Error types for driver setup and write log export.

use scc_common::SongError;
use thiserror::Error;

/// Result type for driver operations.
pub type Result<T> = std::result::Result<T, SccError>;

/// Errors that can occur outside the real-time path.
///
/// Dispatch, tick and acquire never fail; these cover loading configuration,
/// accepting a song and writing logs out.
#[derive(Error, Debug)]
pub enum SccError {
    /// The song handed to the driver is inconsistent.
    #[error("Song error: {0}")]
    Song(#[from] SongError),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
