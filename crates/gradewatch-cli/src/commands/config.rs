//! Config command - View and manage GradeWatch configuration
//!
//! Provides the `gradewatch config` CLI command which:
//! 1. Shows the current configuration (YAML or JSON) with secrets masked
//! 2. Sets individual configuration values via dot-notation keys
//! 3. Validates the configuration file and reports errors

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use gradewatch_core::config::{Config, SourceKind};
use tracing::info;

use super::load_config;
use crate::output::{get_formatter, mask_secret, OutputFormat};

/// Keys accepted by `config set`, with a short description
const SUPPORTED_KEYS: &[(&str, &str)] = &[
    ("account.username", "Portal student ID"),
    ("account.password", "Portal password"),
    ("monitor.interval_secs", "Seconds between grade checks"),
    ("monitor.stop_check_millis", "Stop-signal check granularity (ms)"),
    ("source.kind", "command|file"),
    ("source.command", "Scraper executable"),
    ("source.args", "Scraper arguments, space separated"),
    ("source.file", "Observation JSON file"),
    ("source.headless", "true|false, hide the scraper's browser"),
    ("push.token", "Push token ('none' to disable)"),
    ("push.endpoint", "Push endpoint URL"),
    ("push.title", "Notification title"),
    ("push.template", "html|markdown|txt"),
    ("push.timeout_secs", "Push request timeout"),
    ("storage.snapshot_path", "Snapshot JSON file"),
    ("logging.level", "trace|debug|info|warn|error"),
];

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (e.g., "monitor.interval_secs")
        key: String,
        /// New value
        value: String,
    },
    /// Validate configuration file
    Validate,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        match self {
            ConfigCommand::Show => self.execute_show(config_path, format),
            ConfigCommand::Set { key, value } => self.execute_set(config_path, key, value, format),
            ConfigCommand::Validate => self.execute_validate(config_path, format),
        }
    }

    fn execute_show(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format.is_json());

        let config = redacted(load_config(config_path)?);
        info!(config_path = %config_path.display(), "Showing configuration");

        if format.is_json() {
            let json = serde_json::to_value(&config)
                .context("Failed to serialize configuration to JSON")?;
            formatter.print_json(&json);
        } else {
            formatter.success(&format!("Configuration ({})", config_path.display()));
            formatter.info("");

            let yaml = serde_yaml::to_string(&config)
                .context("Failed to serialize configuration to YAML")?;
            for line in yaml.lines() {
                formatter.info(line);
            }
        }

        Ok(())
    }

    fn execute_set(
        &self,
        config_path: &Path,
        key: &str,
        value: &str,
        format: OutputFormat,
    ) -> Result<()> {
        let formatter = get_formatter(format.is_json());
        let mut config = load_config(config_path)?;

        info!(key = %key, "Setting configuration value");

        if let Err(e) = apply_config_value(&mut config, key, value) {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "error": e.to_string(),
                }));
            } else {
                formatter.error(&format!("Failed to set '{}': {}", key, e));
                formatter.info("");
                formatter.info("Supported keys:");
                for (k, description) in SUPPORTED_KEYS {
                    formatter.row(&format!("  {k}"), description);
                }
            }
            return Ok(());
        }

        // Only errors about the key being set block the save; other
        // sections may still be incomplete while the user fills them in.
        let (blocking, pending): (Vec<_>, Vec<_>) =
            config.validate().into_iter().partition(|e| e.field == key);

        if !blocking.is_empty() {
            let messages: Vec<String> = blocking.iter().map(|e| e.message.clone()).collect();
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "success": false,
                    "key": key,
                    "errors": messages,
                }));
            } else {
                formatter.error(&format!("Invalid value for '{}': {}", key, messages.join("; ")));
            }
            return Ok(());
        }

        config.save(config_path)?;

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "success": true,
                "key": key,
                "config_path": config_path.display().to_string(),
            }));
        } else {
            let shown = if is_secret(key) { mask_secret(value) } else { value.to_string() };
            formatter.success(&format!("Set {} = {}", key, shown));
            formatter.info(&format!("Saved to {}", config_path.display()));
            for error in &pending {
                formatter.warn(&error.to_string());
            }
        }

        Ok(())
    }

    fn execute_validate(&self, config_path: &Path, format: OutputFormat) -> Result<()> {
        let formatter = get_formatter(format.is_json());

        if !config_path.exists() {
            if format.is_json() {
                formatter.print_json(&serde_json::json!({
                    "valid": false,
                    "config_path": config_path.display().to_string(),
                    "errors": ["Configuration file not found"],
                }));
            } else {
                formatter.info(&format!(
                    "Configuration file not found at {}",
                    config_path.display()
                ));
                formatter.info("Run 'gradewatch config set <key> <value>' to create one.");
            }
            return Ok(());
        }

        let config = match Config::load(config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                if format.is_json() {
                    formatter.print_json(&serde_json::json!({
                        "valid": false,
                        "config_path": config_path.display().to_string(),
                        "errors": [format!("{e:#}")],
                    }));
                } else {
                    formatter.error(&format!("{e:#}"));
                }
                return Ok(());
            }
        };

        info!(config_path = %config_path.display(), "Validating configuration");

        let mut errors: Vec<String> = config.validate().iter().map(|e| e.to_string()).collect();
        if !config.credentials().is_complete() {
            errors.push("account: username and password are required to monitor".to_string());
        }

        if format.is_json() {
            formatter.print_json(&serde_json::json!({
                "valid": errors.is_empty(),
                "config_path": config_path.display().to_string(),
                "errors": errors,
            }));
        } else if errors.is_empty() {
            formatter.success("Configuration is valid");
            formatter.info(&format!("File: {}", config_path.display()));
        } else {
            formatter.error(&format!(
                "Configuration has {} error{}:",
                errors.len(),
                if errors.len() == 1 { "" } else { "s" }
            ));
            formatter.info(&format!("File: {}", config_path.display()));
            formatter.info("");
            for error in &errors {
                formatter.info(&format!("  {error}"));
            }
        }

        Ok(())
    }
}

fn is_secret(key: &str) -> bool {
    matches!(key, "account.password" | "push.token")
}

/// Masks the password and push token for display
fn redacted(mut config: Config) -> Config {
    config.account.password = mask_secret(&config.account.password);
    config.push.token = config.push.token.map(|t| mask_secret(&t));
    config
}

fn parse_number(key: &str, value: &str) -> Result<u64> {
    value
        .parse::<u64>()
        .with_context(|| format!("Expected a positive integer for {key}"))
}

/// Apply a dot-notation key/value pair to a Config struct
///
/// See [`SUPPORTED_KEYS`] for the accepted keys.
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        // --- account ---
        "account.username" => config.account.username = value.to_string(),
        "account.password" => config.account.password = value.to_string(),

        // --- monitor ---
        "monitor.interval_secs" => config.monitor.interval_secs = parse_number(key, value)?,
        "monitor.stop_check_millis" => {
            config.monitor.stop_check_millis = parse_number(key, value)?;
        }

        // --- source ---
        "source.kind" => {
            config.source.kind = match value {
                "command" => SourceKind::Command,
                "file" => SourceKind::File,
                other => anyhow::bail!("Unknown source kind '{other}' (expected command or file)"),
            };
        }
        "source.command" => {
            config.source.command = (!value.is_empty()).then(|| value.to_string());
        }
        "source.args" => {
            config.source.args = value.split_whitespace().map(str::to_string).collect();
        }
        "source.file" => {
            config.source.file = (!value.is_empty()).then(|| PathBuf::from(value));
        }
        "source.headless" => {
            config.source.headless = value
                .parse::<bool>()
                .context("Expected true or false for source.headless")?;
        }

        // --- push ---
        "push.token" => {
            config.push.token = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.to_string())
            };
        }
        "push.endpoint" => config.push.endpoint = value.to_string(),
        "push.title" => config.push.title = value.to_string(),
        "push.template" => config.push.template = value.to_string(),
        "push.timeout_secs" => config.push.timeout_secs = parse_number(key, value)?,

        // --- storage ---
        "storage.snapshot_path" => config.storage.snapshot_path = PathBuf::from(value),

        // --- logging ---
        "logging.level" => config.logging.level = value.to_string(),

        _ => anyhow::bail!("Unknown configuration key: '{}'", key),
    }

    Ok(())
}
