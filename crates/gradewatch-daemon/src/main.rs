//! GradeWatch Daemon - Background grade monitoring service
//!
//! This binary runs as a systemd user service and handles:
//! - Periodic grade checks through the configured scraper
//! - Change detection against the stored snapshot
//! - Push notifications for new or changed grades
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! The daemon wires the adapters (snapshot file, scraper, push client) into
//! a `PollScheduler` and hands it to a `MonitorController`. The controller's
//! worker token is a child of a process-wide `CancellationToken` that is
//! triggered on receipt of SIGTERM or SIGINT.
//!
//! The configuration file is read from `$GRADEWATCH_CONFIG` when set,
//! otherwise from the default location.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result};
use gradewatch_core::{config::Config, ports::IPushService};
use gradewatch_monitor::{MonitorController, MonitorEvent, PollScheduler};
use gradewatch_push::PushPlusClient;
use gradewatch_store::JsonSnapshotStore;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configuration path
const CONFIG_ENV: &str = "GRADEWATCH_CONFIG";

/// Main daemon service
///
/// Holds the configuration and the cancellation token for graceful
/// shutdown.
struct DaemonService {
    /// Application configuration loaded from YAML
    config: Config,
    /// Token for signalling graceful shutdown to the worker
    shutdown: CancellationToken,
}

impl DaemonService {
    fn new(config: Config, shutdown: CancellationToken) -> Self {
        Self { config, shutdown }
    }

    /// Builds the scheduler from the configured adapters
    fn build_scheduler(&self, events: mpsc::UnboundedSender<MonitorEvent>) -> Result<PollScheduler> {
        let store = Arc::new(JsonSnapshotStore::new(&self.config.storage.snapshot_path));
        let source = gradewatch_source::from_config(&self.config.source)
            .context("Failed to set up grade source")?;
        let push: Arc<dyn IPushService> = Arc::new(
            PushPlusClient::from_config(&self.config.push)
                .context("Failed to create push client")?,
        );

        if self.config.push.token().is_none() {
            warn!("No push token configured; changes will only be logged");
        }

        let scheduler = PollScheduler::from_config(&self.config, source, store, Some(push))?
            .with_events(events);
        Ok(scheduler)
    }

    /// Runs the monitor until shutdown
    ///
    /// 1. Wires adapters into a scheduler
    /// 2. Starts the worker and a task that logs its events
    /// 3. Waits for the worker to exit after the shutdown token fires
    async fn run(&self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let scheduler = self.build_scheduler(tx)?;

        info!(
            source = ?self.config.source.kind,
            snapshot = %self.config.storage.snapshot_path.display(),
            interval_secs = self.config.monitor.interval_secs,
            "Starting grade monitor"
        );

        let mut controller = MonitorController::with_parent(self.shutdown.clone());
        controller
            .start(scheduler)
            .context("Failed to start monitor")?;

        let logger = tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                log_event(&event);
            }
        });

        let rounds = controller.wait().await?;
        // The worker dropped its sender; the logger drains and exits
        let _ = logger.await;

        info!(rounds, "Monitor terminated");
        Ok(())
    }
}

/// Logs a monitor event at the level its outcome deserves
fn log_event(event: &MonitorEvent) {
    match event {
        MonitorEvent::AcquisitionFailed { .. } => warn!(%event),
        MonitorEvent::SnapshotSaveFailed { .. } => error!(%event),
        MonitorEvent::RoundCompleted { report, .. } if report.changed() && !report.is_first_run() => {
            for entry in report.entries() {
                info!(kind = %entry.kind(), course = entry.course().unwrap_or("-"), "Change detected");
            }
            info!(%event);
        }
        _ => info!(%event),
    }
}

/// Resolves the configuration path from the environment override
fn resolve_config_path(env_override: Option<OsString>) -> PathBuf {
    env_override
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(Config::default_path)
}

/// Loads the configuration; a missing file means defaults
fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        Config::load(path)
    } else {
        Ok(Config::default())
    }
}

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = resolve_config_path(std::env::var_os(CONFIG_ENV));
    let config = load_config(&config_path)?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!(config_path = %config_path.display(), "GradeWatch daemon starting (gradewatchd)");

    let shutdown_token = CancellationToken::new();

    // Spawn signal handler task
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    let service = DaemonService::new(config, shutdown_token);
    let result = service.run().await;

    match &result {
        Ok(()) => info!("GradeWatch daemon shut down gracefully"),
        Err(e) => error!(error = %format!("{e:#}"), "GradeWatch daemon exiting with error"),
    }

    result
}
