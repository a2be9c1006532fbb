//! Monitor lifecycle: Idle ⇄ Running
//!
//! [`MonitorController`] starts at most one [`PollScheduler`] worker at a
//! time and stops it through a cancellation token. Stopping is cooperative:
//! the worker finishes its current round (an in-flight acquisition is never
//! interrupted) and exits at its next stop check.

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::{scheduler::PollScheduler, MonitorError};

/// Observable lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorState {
    Idle,
    Running,
}

/// Starts, stops and joins the poll worker
pub struct MonitorController {
    /// Parent of every worker token; cancelling it stops the worker too
    parent: CancellationToken,
    /// Token of the current worker
    shutdown: CancellationToken,
    handle: Option<JoinHandle<u64>>,
}

impl MonitorController {
    pub fn new() -> Self {
        Self::with_parent(CancellationToken::new())
    }

    /// Creates a controller whose workers also stop when `parent` is
    /// cancelled (e.g. the process-wide shutdown token)
    pub fn with_parent(parent: CancellationToken) -> Self {
        let shutdown = parent.child_token();
        Self {
            parent,
            shutdown,
            handle: None,
        }
    }

    /// Current state; a worker that has exited counts as Idle
    pub fn state(&self) -> MonitorState {
        match &self.handle {
            Some(handle) if !handle.is_finished() => MonitorState::Running,
            _ => MonitorState::Idle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == MonitorState::Running
    }

    /// Spawns the worker
    ///
    /// # Errors
    /// * [`MonitorError::AlreadyRunning`] - a worker is active
    /// * [`MonitorError::MissingCredentials`] - username or password is blank
    pub fn start(&mut self, scheduler: PollScheduler) -> Result<(), MonitorError> {
        if self.is_running() {
            return Err(MonitorError::AlreadyRunning);
        }
        if !scheduler.credentials().is_complete() {
            return Err(MonitorError::MissingCredentials);
        }

        self.shutdown = self.parent.child_token();
        let token = self.shutdown.clone();
        self.handle = Some(tokio::spawn(scheduler.run(token)));
        info!("Monitor worker started");
        Ok(())
    }

    /// Requests the worker to stop at its next stop check
    ///
    /// # Errors
    /// [`MonitorError::NotRunning`] when no worker is active.
    pub fn stop(&self) -> Result<(), MonitorError> {
        if !self.is_running() {
            return Err(MonitorError::NotRunning);
        }
        info!("Stop requested");
        self.shutdown.cancel();
        Ok(())
    }

    /// Waits for the worker to exit and returns the number of rounds it ran
    ///
    /// # Errors
    /// * [`MonitorError::NotRunning`] - no worker was started
    /// * [`MonitorError::WorkerPanicked`] - the worker task did not finish cleanly
    pub async fn wait(&mut self) -> Result<u64, MonitorError> {
        let handle = self.handle.take().ok_or(MonitorError::NotRunning)?;
        match handle.await {
            Ok(rounds) => Ok(rounds),
            Err(e) => {
                error!(error = %e, "Monitor worker failed");
                Err(MonitorError::WorkerPanicked(e.to_string()))
            }
        }
    }
}

impl Default for MonitorController {
    fn default() -> Self {
        Self::new()
    }
}
