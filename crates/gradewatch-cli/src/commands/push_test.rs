//! Push-test command - Send a test notification
//!
//! Provides the `gradewatch push-test` CLI command which verifies the
//! configured token and endpoint without touching the grade snapshot.

use std::{path::Path, sync::Arc};

use anyhow::{Context, Result};
use clap::Args;
use gradewatch_core::usecases::{DispatchOutcome, NotifyChangesUseCase};
use gradewatch_push::PushPlusClient;
use tracing::info;

use super::load_config;
use crate::output::{get_formatter, OutputFormat};

/// Push-test command
#[derive(Debug, Args)]
pub struct PushTestCommand {}

impl PushTestCommand {
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format.is_json());
        let config = load_config(config_path)?;

        let client =
            PushPlusClient::from_config(&config.push).context("Failed to create push client")?;
        let notifier = NotifyChangesUseCase::new(Arc::new(client))
            .with_title(config.push.title.clone())
            .with_dialect(config.push.dialect());

        info!(endpoint = %config.push.endpoint, "Sending test notification");
        let outcome = notifier.send_test(config.push.token()).await;

        if format.is_json() {
            let value = match &outcome {
                DispatchOutcome::Sent => serde_json::json!({"success": true, "status": "sent"}),
                DispatchOutcome::Skipped(reason) => serde_json::json!({
                    "success": false,
                    "status": "skipped",
                    "reason": reason.to_string(),
                }),
                DispatchOutcome::Failed(e) => serde_json::json!({
                    "success": false,
                    "status": "failed",
                    "error": e,
                }),
            };
            formatter.print_json(&value);
            return Ok(());
        }

        match outcome {
            DispatchOutcome::Sent => {
                formatter.success(&format!("Test notification sent to {}", config.push.endpoint))
            }
            DispatchOutcome::Skipped(_) => {
                formatter.warn("No push token configured");
                formatter.info("Set one with 'gradewatch config set push.token <token>'");
            }
            DispatchOutcome::Failed(e) => formatter.error(&format!("Test notification failed: {e}")),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_push_test_without_token_makes_no_request() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        // An unreachable endpoint would fail the dispatch if it were attempted
        std::fs::write(&config_path, "push:\n  endpoint: http://127.0.0.1:1/send\n").unwrap();

        let cmd = PushTestCommand {};
        assert!(cmd.execute(&config_path, OutputFormat::Json).await.is_ok());
    }

    #[tokio::test]
    async fn test_push_test_reports_failure_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        std::fs::write(
            &config_path,
            "push:\n  token: abc123\n  endpoint: http://127.0.0.1:1/send\n  timeout_secs: 2\n",
        )
        .unwrap();

        let cmd = PushTestCommand {};
        assert!(cmd.execute(&config_path, OutputFormat::Human).await.is_ok());
    }
}
