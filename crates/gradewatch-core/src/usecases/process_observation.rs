//! Observation processing use case
//!
//! Handles everything that happens after a successful acquisition:
//! 1. Load the stored snapshot (unreadable data counts as "no prior data")
//! 2. Diff the new observation against it
//! 3. Persist the new observation, changed or not
//! 4. Notify when the report shows changes
//!
//! A failed save is retried once. If the retry also fails the round's
//! notification is suppressed so the same change is detected and pushed
//! again by the next round, once persistence works.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::notify_changes::{DispatchOutcome, NotifyChangesUseCase};
use crate::{
    domain::{compare, ChangeReport, Observation},
    ports::ISnapshotStore,
};

/// Everything a single processed round produced
#[derive(Debug, Clone)]
pub struct RoundOutcome {
    /// The diff between the new observation and the stored snapshot
    pub report: ChangeReport,
    /// Save failure after the retry, if any
    pub save_error: Option<String>,
    /// Dispatch result; `None` when no dispatch was attempted
    pub dispatch: Option<DispatchOutcome>,
}

impl RoundOutcome {
    pub fn saved(&self) -> bool {
        self.save_error.is_none()
    }
}

/// Use case driving diff, persist and notify for one observation
pub struct ProcessObservationUseCase {
    snapshot_store: Arc<dyn ISnapshotStore>,
    notifier: Option<NotifyChangesUseCase>,
    push_token: Option<String>,
}

impl ProcessObservationUseCase {
    /// Creates the use case without notifications
    ///
    /// # Arguments
    ///
    /// * `snapshot_store` - Persistent storage for the last observation
    pub fn new(snapshot_store: Arc<dyn ISnapshotStore>) -> Self {
        Self {
            snapshot_store,
            notifier: None,
            push_token: None,
        }
    }

    /// Enables notifications through `notifier`, delivered to `push_token`
    pub fn with_notifier(
        mut self,
        notifier: NotifyChangesUseCase,
        push_token: Option<String>,
    ) -> Self {
        self.notifier = Some(notifier);
        self.push_token = push_token;
        self
    }

    /// Processes one freshly acquired observation
    pub async fn execute(&self, observation: &Observation) -> RoundOutcome {
        // Step 1: Read the baseline
        let previous = self.snapshot_store.load_or_none().await;

        // Step 2: Diff
        let report = compare(observation, previous.as_ref());
        debug!(
            changed = report.changed(),
            first_run = report.is_first_run(),
            entries = report.entries().len(),
            "Compared observation with snapshot"
        );

        // Step 3: Persist, retrying once
        let save_error = self.save_with_retry(observation).await;

        // Step 4: Notify
        let dispatch = if !report.changed() {
            None
        } else if save_error.is_some() {
            warn!("Snapshot not saved, deferring notification to the next round");
            None
        } else {
            match &self.notifier {
                Some(notifier) => Some(notifier.notify(&report, self.push_token.as_deref()).await),
                None => None,
            }
        };

        RoundOutcome {
            report,
            save_error,
            dispatch,
        }
    }

    async fn save_with_retry(&self, observation: &Observation) -> Option<String> {
        match self.snapshot_store.save(observation).await {
            Ok(()) => return None,
            Err(e) => warn!(error = %e, "Failed to save snapshot, retrying once"),
        }

        match self.snapshot_store.save(observation).await {
            Ok(()) => {
                info!("Snapshot saved on retry");
                None
            }
            Err(e) => {
                error!(error = %e, "Failed to save snapshot");
                Some(e.to_string())
            }
        }
    }
}
