//! GradeWatch Monitor - Periodic grade checking
//!
//! Provides:
//! - The poll loop that acquires, diffs, persists and notifies each round
//! - The Idle/Running lifecycle around it
//! - Status events for whichever surface displays progress
//!
//! ## Modules
//!
//! - [`scheduler`] - Round execution and the interruptible sleep between rounds
//! - [`controller`] - Start/stop/wait of the single background worker
//! - [`events`] - Progress events sent over an unbounded channel

pub mod controller;
pub mod events;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testing;

pub use controller::{MonitorController, MonitorState};
pub use events::MonitorEvent;
pub use scheduler::{MonitorSettings, PollScheduler};

use gradewatch_core::config::ValidationError;
use thiserror::Error;

/// Errors that can occur when controlling the monitor
#[derive(Debug, Error)]
pub enum MonitorError {
    /// A worker is already active
    #[error("monitor is already running")]
    AlreadyRunning,

    /// No worker is active
    #[error("monitor is not running")]
    NotRunning,

    /// Username or password is blank
    #[error("account username and password must be configured")]
    MissingCredentials,

    /// The configuration failed validation
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    /// The worker task panicked or was aborted
    #[error("monitor worker failed: {0}")]
    WorkerPanicked(String),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
