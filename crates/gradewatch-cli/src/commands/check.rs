//! Check command - Run one grade check now
//!
//! Provides the `gradewatch check` CLI command which performs a single
//! round: acquire, compare with the stored snapshot, save, and push a
//! notification when something changed (unless `--no-push`).

use std::path::Path;

use anyhow::Result;
use clap::Args;
use gradewatch_core::usecases::{format_entry, DispatchOutcome};
use gradewatch_monitor::MonitorEvent;
use tokio::sync::mpsc;
use tracing::info;

use super::{build_scheduler, load_config, print_event};
use crate::output::{get_formatter, OutputFormat};

/// Check command
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Compare and save, but do not send a notification
    #[arg(long)]
    pub no_push: bool,
}

impl CheckCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format.is_json());
        let config = load_config(config_path)?;

        if !config.credentials().is_complete() {
            anyhow::bail!(
                "No account configured. Run 'gradewatch config set account.username <id>' \
                 and 'gradewatch config set account.password <password>' first."
            );
        }

        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut scheduler = build_scheduler(&config, !self.no_push, tx)?;

        info!(no_push = self.no_push, "Running one grade check");
        let outcome = scheduler.run_round().await;
        drop(scheduler);

        let mut acquisition_error = None;
        while let Some(event) = rx.recv().await {
            if !format.is_json() {
                print_event(&event, format, &*formatter);
            }
            if let MonitorEvent::AcquisitionFailed { error, .. } = event {
                acquisition_error = Some(error);
            }
        }

        let Some(outcome) = outcome else {
            let error = acquisition_error.unwrap_or_else(|| "acquisition failed".to_string());
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "error": error,
                }));
            }
            anyhow::bail!("Grade check failed: {error}");
        };

        if format.is_json() {
            let entries: Vec<String> = outcome.report.entries().iter().map(format_entry).collect();
            let dispatch = match &outcome.dispatch {
                None => serde_json::Value::Null,
                Some(DispatchOutcome::Sent) => serde_json::json!({"status": "sent"}),
                Some(DispatchOutcome::Skipped(reason)) => {
                    serde_json::json!({"status": "skipped", "reason": reason.to_string()})
                }
                Some(DispatchOutcome::Failed(e)) => {
                    serde_json::json!({"status": "failed", "error": e})
                }
            };
            formatter.print_json(&serde_json::json!({
                "success": outcome.saved(),
                "report": outcome.report,
                "changes": entries,
                "saved": outcome.saved(),
                "save_error": outcome.save_error,
                "dispatch": dispatch,
            }));
        } else if self.no_push && outcome.report.changed() && !outcome.report.is_first_run() {
            formatter.info("Notification not sent (--no-push)");
        }

        Ok(())
    }
}
