//! CLI subcommands

pub mod check;
pub mod config;
pub mod push_test;
pub mod run;
pub mod status;

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use gradewatch_core::{config::Config, ports::IPushService};
use gradewatch_monitor::{MonitorEvent, PollScheduler};
use gradewatch_push::PushPlusClient;
use gradewatch_store::JsonSnapshotStore;
use tokio::sync::mpsc;

use crate::output::{OutputFormat, OutputFormatter};

/// Loads the configuration at `path`; a missing file means defaults
pub(crate) fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        Ok(Config::default())
    }
}

/// Wires the configured adapters into a poll scheduler
///
/// With `notify` false the round still diffs and saves but never pushes.
pub(crate) fn build_scheduler(
    config: &Config,
    notify: bool,
    events: mpsc::UnboundedSender<MonitorEvent>,
) -> Result<PollScheduler> {
    let store = Arc::new(JsonSnapshotStore::new(&config.storage.snapshot_path));
    let source =
        gradewatch_source::from_config(&config.source).context("Failed to set up grade source")?;
    let push: Option<Arc<dyn IPushService>> = if notify {
        Some(Arc::new(
            PushPlusClient::from_config(&config.push).context("Failed to create push client")?,
        ))
    } else {
        None
    };

    Ok(PollScheduler::from_config(config, source, store, push)?.with_events(events))
}

/// Prints one monitor event
pub(crate) fn print_event(event: &MonitorEvent, format: OutputFormat, formatter: &dyn OutputFormatter) {
    if format.is_json() {
        formatter.print_json(&serde_json::json!({
            "event": event.kind(),
            "message": event.to_string(),
        }));
        return;
    }

    match event {
        MonitorEvent::RoundCompleted { report, .. } => {
            if event.is_failure() {
                formatter.warn(&event.to_string());
            } else {
                formatter.success(&event.to_string());
            }
            if !report.is_first_run() {
                for entry in report.entries() {
                    formatter.info(&format!("  {}", gradewatch_core::usecases::format_entry(entry)));
                }
            }
        }
        MonitorEvent::SnapshotSaved { .. } => formatter.info(&event.to_string()),
        _ if event.is_failure() => formatter.warn(&event.to_string()),
        _ => formatter.info(&event.to_string()),
    }
}
