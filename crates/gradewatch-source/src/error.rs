//! Error types for grade acquisition

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while acquiring an observation
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configuration does not name a command or file to read from
    #[error("grade source not configured: {0}")]
    NotConfigured(String),

    /// The scraper process could not be started
    #[error("failed to start scraper '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The scraper exited unsuccessfully
    #[error("scraper exited with {}: {stderr}", exit_label(.status))]
    Failed {
        /// Exit code, `None` when killed by a signal
        status: Option<i32>,
        /// Trimmed standard error output
        stderr: String,
    },

    /// The scraper or file produced something that is not an observation
    #[error("invalid observation data: {0}")]
    InvalidOutput(String),

    /// An observation file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn exit_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {code}"),
        None => "a signal".to_string(),
    }
}
