//! Domain error types
//!
//! Snapshot persistence errors are classified here so callers can tell
//! "no snapshot yet" (`Ok(None)` from the store) apart from a corrupt record
//! or an unavailable filesystem.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a snapshot store
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot location could not be read or written
    #[error("snapshot I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored record exists but is not a valid observation
    #[error("snapshot at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The observation could not be encoded
    #[error("failed to encode snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl SnapshotError {
    /// Returns true if the stored record was present but unreadable as data
    pub fn is_corrupt(&self) -> bool {
        matches!(self, SnapshotError::Corrupt { .. })
    }
}
