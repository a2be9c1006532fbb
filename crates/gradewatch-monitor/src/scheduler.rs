//! Poll scheduler - runs grade-check rounds on a fixed interval
//!
//! The [`PollScheduler`] owns everything one worker needs: the grade
//! source, the observation processor (diff, persist, notify) and the
//! credentials. [`run`](PollScheduler::run) loops until its cancellation
//! token fires.
//!
//! ## Round
//!
//! ```text
//! RoundStarted ──→ acquire ──┬─ error ──→ AcquisitionFailed ──┐
//!                            │                                │
//!                            └─ ok ──→ load / diff / save ──→ RoundCompleted
//!                                                             │
//!                                      Sleeping ←─────────────┘
//! ```
//!
//! The sleep is split into `stop_check` steps and the token is checked
//! between steps, so a stop takes effect within one step. A round that has
//! started always runs to completion.

use std::{sync::Arc, time::Duration};

use chrono::Local;
use gradewatch_core::{
    config::{Config, MonitorConfig},
    ports::{Credentials, IGradeSource, IPushService, ISnapshotStore},
    usecases::{NotifyChangesUseCase, ProcessObservationUseCase, RoundOutcome},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{events::MonitorEvent, MonitorError};

/// Timing of the poll loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Pause between the end of one round and the start of the next
    pub interval: Duration,
    /// Granularity of stop-signal checks while sleeping
    pub stop_check: Duration,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1800),
            stop_check: Duration::from_secs(1),
        }
    }
}

impl From<&MonitorConfig> for MonitorSettings {
    fn from(config: &MonitorConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.interval_secs),
            stop_check: Duration::from_millis(config.stop_check_millis),
        }
    }
}

/// Periodically acquires, diffs and persists grade observations
pub struct PollScheduler {
    source: Arc<dyn IGradeSource>,
    processor: ProcessObservationUseCase,
    credentials: Credentials,
    settings: MonitorSettings,
    events: Option<mpsc::UnboundedSender<MonitorEvent>>,
    round: u64,
}

impl PollScheduler {
    /// Creates a scheduler with default timing and no event channel
    ///
    /// # Arguments
    /// * `source` - Acquisition collaborator
    /// * `processor` - Diff, persist and notify use case
    /// * `credentials` - Handed to the source on every round
    pub fn new(
        source: Arc<dyn IGradeSource>,
        processor: ProcessObservationUseCase,
        credentials: Credentials,
    ) -> Self {
        Self {
            source,
            processor,
            credentials,
            settings: MonitorSettings::default(),
            events: None,
            round: 0,
        }
    }

    /// Wires a scheduler from a loaded configuration
    ///
    /// Notifications are enabled when `push_service` is given; the token
    /// comes from `config.push`.
    ///
    /// # Errors
    /// [`MonitorError::InvalidConfig`] when `config.validate()` reports errors.
    pub fn from_config(
        config: &Config,
        source: Arc<dyn IGradeSource>,
        snapshot_store: Arc<dyn ISnapshotStore>,
        push_service: Option<Arc<dyn IPushService>>,
    ) -> Result<Self, MonitorError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(MonitorError::InvalidConfig(errors));
        }

        let mut processor = ProcessObservationUseCase::new(snapshot_store);
        if let Some(push_service) = push_service {
            let notifier = NotifyChangesUseCase::new(push_service)
                .with_title(config.push.title.clone())
                .with_dialect(config.push.dialect());
            processor = processor.with_notifier(notifier, config.push.token().map(str::to_string));
        }

        Ok(Self::new(source, processor, config.credentials())
            .with_settings(MonitorSettings::from(&config.monitor)))
    }

    pub fn with_settings(mut self, settings: MonitorSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Sends progress events to `events`
    pub fn with_events(mut self, events: mpsc::UnboundedSender<MonitorEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn settings(&self) -> MonitorSettings {
        self.settings
    }

    /// Number of rounds started so far
    pub fn rounds(&self) -> u64 {
        self.round
    }

    fn emit(&self, event: MonitorEvent) {
        if let Some(tx) = &self.events {
            // Receiver gone: nobody is watching
            let _ = tx.send(event);
        }
    }

    /// Runs a single round
    ///
    /// Returns `None` when acquisition failed, in which case the snapshot
    /// was neither read nor written.
    pub async fn run_round(&mut self) -> Option<RoundOutcome> {
        self.round += 1;
        let round = self.round;
        self.emit(MonitorEvent::RoundStarted { round });
        info!(round, source = self.source.name(), "Starting grade check");

        let observation = match self.source.acquire(&self.credentials).await {
            Ok(observation) => observation,
            Err(e) => {
                let err_msg = format!("{e:#}");
                warn!(round, error = %err_msg, "Failed to acquire grades");
                self.emit(MonitorEvent::AcquisitionFailed {
                    round,
                    error: err_msg,
                });
                return None;
            }
        };
        debug!(round, courses = observation.course_count(), "Observation acquired");

        let outcome = self.processor.execute(&observation).await;

        match &outcome.save_error {
            None => self.emit(MonitorEvent::SnapshotSaved {
                round,
                snapshot: observation,
            }),
            Some(e) => {
                error!(round, error = %e, "Snapshot not persisted this round");
                self.emit(MonitorEvent::SnapshotSaveFailed {
                    round,
                    error: e.clone(),
                });
            }
        }

        info!(
            round,
            changed = outcome.report.changed(),
            first_run = outcome.report.is_first_run(),
            entries = outcome.report.entries().len(),
            "Grade check completed"
        );
        self.emit(MonitorEvent::RoundCompleted {
            round,
            report: outcome.report.clone(),
            dispatch: outcome.dispatch.clone(),
        });

        Some(outcome)
    }

    /// Sleeps for one interval in `stop_check` steps
    ///
    /// Returns `false` as soon as `shutdown` is observed cancelled.
    async fn sleep_interval(&self, shutdown: &CancellationToken) -> bool {
        if shutdown.is_cancelled() {
            return false;
        }

        let interval = self.settings.interval;
        let next_run = chrono::Duration::from_std(interval)
            .ok()
            .and_then(|d| Local::now().checked_add_signed(d))
            .unwrap_or_else(Local::now);
        self.emit(MonitorEvent::Sleeping {
            seconds: interval.as_secs(),
            next_run,
        });
        debug!(seconds = interval.as_secs(), next_run = %next_run.format("%H:%M:%S"), "Sleeping");

        let step = self.settings.stop_check.max(Duration::from_millis(1));
        let mut remaining = interval;
        while !remaining.is_zero() {
            if shutdown.is_cancelled() {
                return false;
            }
            let nap = step.min(remaining);
            tokio::time::sleep(nap).await;
            remaining = remaining.saturating_sub(nap);
        }
        !shutdown.is_cancelled()
    }

    /// Main loop: a round immediately, then one round per interval
    ///
    /// Returns the number of rounds started once `shutdown` is cancelled.
    pub async fn run(mut self, shutdown: CancellationToken) -> u64 {
        info!(
            interval_secs = self.settings.interval.as_secs(),
            stop_check_ms = self.settings.stop_check.as_millis() as u64,
            source = self.source.name(),
            "Monitor starting"
        );

        while !shutdown.is_cancelled() {
            self.run_round().await;
            if !self.sleep_interval(&shutdown).await {
                break;
            }
        }

        info!(rounds = self.round, "Monitor stopped");
        self.emit(MonitorEvent::Stopped { rounds: self.round });
        self.round
    }
}
