//! Status events emitted by the poll scheduler
//!
//! Events flow over an unbounded channel to whichever surface renders
//! them (the CLI prints them, the daemon logs them). Sending never blocks
//! the worker, and a dropped receiver is ignored.

use std::fmt;

use chrono::{DateTime, Local};
use gradewatch_core::{
    domain::{ChangeReport, Observation},
    usecases::DispatchOutcome,
};

/// One step of the monitor's progress
#[derive(Debug, Clone)]
pub enum MonitorEvent {
    /// A round began; `round` counts from 1
    RoundStarted { round: u64 },
    /// The grade source failed; nothing was compared or saved
    AcquisitionFailed { round: u64, error: String },
    /// The new observation was diffed and processed
    RoundCompleted {
        round: u64,
        report: ChangeReport,
        dispatch: Option<DispatchOutcome>,
    },
    /// The snapshot now on disk, for display
    SnapshotSaved { round: u64, snapshot: Observation },
    /// The snapshot could not be written, even after a retry
    SnapshotSaveFailed { round: u64, error: String },
    /// The worker is idle until `next_run`
    Sleeping {
        seconds: u64,
        next_run: DateTime<Local>,
    },
    /// The worker observed the stop request and exited
    Stopped { rounds: u64 },
}

impl MonitorEvent {
    /// Stable snake_case name, used for machine-readable output
    pub fn kind(&self) -> &'static str {
        match self {
            MonitorEvent::RoundStarted { .. } => "round_started",
            MonitorEvent::AcquisitionFailed { .. } => "acquisition_failed",
            MonitorEvent::RoundCompleted { .. } => "round_completed",
            MonitorEvent::SnapshotSaved { .. } => "snapshot_saved",
            MonitorEvent::SnapshotSaveFailed { .. } => "snapshot_save_failed",
            MonitorEvent::Sleeping { .. } => "sleeping",
            MonitorEvent::Stopped { .. } => "stopped",
        }
    }

    /// Whether the event reports a problem
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            MonitorEvent::AcquisitionFailed { .. } | MonitorEvent::SnapshotSaveFailed { .. }
        ) || matches!(
            self,
            MonitorEvent::RoundCompleted {
                dispatch: Some(DispatchOutcome::Failed(_)),
                ..
            }
        )
    }
}

impl fmt::Display for MonitorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonitorEvent::RoundStarted { round } => write!(f, "Round {round}: checking grades"),
            MonitorEvent::AcquisitionFailed { round, error } => {
                write!(f, "Round {round}: failed to fetch grades: {error}")
            }
            MonitorEvent::RoundCompleted {
                round,
                report,
                dispatch,
            } => {
                if report.is_first_run() {
                    write!(f, "Round {round}: baseline established")?;
                } else if report.changed() {
                    write!(f, "Round {round}: {} change(s) detected", report.entries().len())?;
                } else {
                    write!(f, "Round {round}: no changes")?;
                }
                match dispatch {
                    Some(DispatchOutcome::Sent) => write!(f, ", notification sent"),
                    Some(DispatchOutcome::Failed(e)) => write!(f, ", notification failed: {e}"),
                    Some(DispatchOutcome::Skipped(reason)) if !report.is_first_run() => {
                        write!(f, ", notification skipped ({reason})")
                    }
                    _ => Ok(()),
                }
            }
            MonitorEvent::SnapshotSaved { round, snapshot } => write!(
                f,
                "Round {round}: snapshot saved ({} courses, GPA {}, rank {})",
                snapshot.course_count(),
                snapshot.gpa(),
                snapshot.rank()
            ),
            MonitorEvent::SnapshotSaveFailed { round, error } => {
                write!(f, "Round {round}: failed to save snapshot: {error}")
            }
            MonitorEvent::Sleeping { seconds, next_run } => write!(
                f,
                "Sleeping {seconds}s, next check at {}",
                next_run.format("%H:%M:%S")
            ),
            MonitorEvent::Stopped { rounds } => write!(f, "Monitor stopped after {rounds} round(s)"),
        }
    }
}
