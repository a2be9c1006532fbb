//! Run command - Monitor grades in the foreground
//!
//! Provides the `gradewatch run` CLI command which starts the poll loop
//! and prints every monitor event until Ctrl+C.

use std::{path::Path, time::Duration};

use anyhow::Result;
use clap::Args;
use gradewatch_monitor::{MonitorController, MonitorSettings};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{build_scheduler, load_config, print_event};
use crate::output::{get_formatter, OutputFormat};

/// Run command
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Override the poll interval in seconds
    #[arg(long)]
    pub interval: Option<u64>,

    /// Compare and save, but never send notifications
    #[arg(long)]
    pub no_push: bool,
}

impl RunCommand {
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
        if let Some(secs) = self.interval.filter(|s| *s > 0) {
            let settings = MonitorSettings {
                interval: Duration::from_secs(secs),
                ..scheduler.settings()
            };
            scheduler = scheduler.with_settings(settings);
        }

        let interval = scheduler.settings().interval;
        let shutdown = CancellationToken::new();
        let mut controller = MonitorController::with_parent(shutdown.clone());
        controller.start(scheduler)?;

        formatter.success(&format!(
            "Monitoring started (every {}s). Press Ctrl+C to stop.",
            interval.as_secs()
        ));
        info!(interval_secs = interval.as_secs(), "Foreground monitor started");

        let ctrl_c = tokio::spawn({
            let shutdown = shutdown.clone();
            async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    warn!(error = %e, "Failed to listen for Ctrl+C");
                    return;
                }
                shutdown.cancel();
            }
        });

        while let Some(event) = rx.recv().await {
            print_event(&event, format, &*formatter);
        }

        let rounds = controller.wait().await?;
        ctrl_c.abort();

        formatter.success(&format!("Monitoring stopped after {rounds} round(s)"));
        Ok(())
    }
}
