//! Configuration module for GradeWatch.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, saving, validation, defaults, and a builder pattern for
//! programmatic use. Every section is optional in the file; missing sections
//! and fields take their defaults.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    ports::{Credentials, MarkupDialect},
    usecases::DEFAULT_TITLE,
};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for GradeWatch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub account: AccountConfig,
    pub monitor: MonitorConfig,
    pub source: SourceConfig,
    pub push: PushConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Portal login.
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Student ID used to log into the portal.
    pub username: String,
    /// Portal password, stored as plain text.
    pub password: String,
}

/// Polling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Seconds to sleep between rounds.
    pub interval_secs: u64,
    /// Milliseconds between stop-signal checks while sleeping.
    pub stop_check_millis: u64,
}

/// Which acquisition adapter to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Run an external scraper command that prints an observation as JSON.
    #[default]
    Command,
    /// Read an observation from a JSON file.
    File,
}

/// Acquisition settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    /// Scraper executable, required when `kind` is `command`.
    pub command: Option<String>,
    /// Extra arguments passed to the scraper.
    pub args: Vec<String>,
    /// Observation file, required when `kind` is `file`.
    pub file: Option<PathBuf>,
    /// Ask the scraper to hide its browser window.
    pub headless: bool,
}

/// Push notification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PushConfig {
    /// Destination token. `None` disables notifications.
    pub token: Option<String>,
    /// Push endpoint URL.
    pub endpoint: String,
    /// Notification title.
    pub title: String,
    /// Markup dialect: `html`, `markdown`, or `txt`.
    pub template: String,
    /// HTTP timeout for a push request.
    pub timeout_secs: u64,
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path of the JSON snapshot file.
    pub snapshot_path: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load() / save()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Write the configuration as YAML, creating the parent directory.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create configuration directory")?;
        }
        let yaml = serde_yaml::to_string(self).context("Failed to serialize configuration")?;
        std::fs::write(path, yaml)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/gradewatch/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("gradewatch")
            .join("config.yaml")
    }

    /// Credentials for the grade source.
    pub fn credentials(&self) -> Credentials {
        Credentials::new(&self.account.username, &self.account.password)
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl std::fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountConfig")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1800,
            stop_check_millis: 1000,
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Command,
            command: None,
            args: Vec::new(),
            file: None,
            headless: true,
        }
    }
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            token: None,
            endpoint: "http://www.pushplus.plus/send".to_string(),
            title: DEFAULT_TITLE.to_string(),
            template: MarkupDialect::Html.to_string(),
            timeout_secs: 15,
        }
    }
}

impl PushConfig {
    /// Parsed markup dialect; invalid values fall back to HTML.
    pub fn dialect(&self) -> MarkupDialect {
        self.template.parse().unwrap_or_default()
    }

    /// Token with surrounding whitespace removed; blank counts as absent.
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("~/.local/share"))
                .join("gradewatch")
                .join("grade_history.json"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"monitor.interval_secs"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid values for `push.template`.
pub const VALID_TEMPLATES: &[&str] = &["html", "markdown", "txt"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid. Credentials are not
    /// checked here; the monitor refuses to start without them.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- monitor ---
        if self.monitor.interval_secs == 0 {
            errors.push(ValidationError {
                field: "monitor.interval_secs".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.monitor.stop_check_millis == 0 {
            errors.push(ValidationError {
                field: "monitor.stop_check_millis".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- source ---
        match self.source.kind {
            SourceKind::Command => {
                let missing = self
                    .source
                    .command
                    .as_deref()
                    .map_or(true, |c| c.trim().is_empty());
                if missing {
                    errors.push(ValidationError {
                        field: "source.command".into(),
                        message: "required when source.kind is 'command'".into(),
                    });
                }
            }
            SourceKind::File => {
                if self.source.file.is_none() {
                    errors.push(ValidationError {
                        field: "source.file".into(),
                        message: "required when source.kind is 'file'".into(),
                    });
                }
            }
        }

        // --- push ---
        if !VALID_TEMPLATES.contains(&self.push.template.as_str()) {
            errors.push(ValidationError {
                field: "push.template".into(),
                message: format!(
                    "invalid template '{}'; valid options: {}",
                    self.push.template,
                    VALID_TEMPLATES.join(", ")
                ),
            });
        }
        if !(self.push.endpoint.starts_with("http://") || self.push.endpoint.starts_with("https://"))
        {
            errors.push(ValidationError {
                field: "push.endpoint".into(),
                message: format!("must be an http(s) URL, got '{}'", self.push.endpoint),
            });
        }
        if self.push.timeout_secs == 0 {
            errors.push(ValidationError {
                field: "push.timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use gradewatch_core::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .account("20300001", "secret")
///     .monitor_interval_secs(600)
///     .source_command("fetch-grades")
///     .push_token("0123456789abcdef")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- account ---

    pub fn account(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.account.username = username.into();
        self.config.account.password = password.into();
        self
    }

    // --- monitor ---

    pub fn monitor_interval_secs(mut self, seconds: u64) -> Self {
        self.config.monitor.interval_secs = seconds;
        self
    }

    pub fn monitor_stop_check_millis(mut self, millis: u64) -> Self {
        self.config.monitor.stop_check_millis = millis;
        self
    }

    // --- source ---

    pub fn source_command(mut self, command: impl Into<String>) -> Self {
        self.config.source.kind = SourceKind::Command;
        self.config.source.command = Some(command.into());
        self
    }

    pub fn source_args(mut self, args: Vec<String>) -> Self {
        self.config.source.args = args;
        self
    }

    pub fn source_file(mut self, file: PathBuf) -> Self {
        self.config.source.kind = SourceKind::File;
        self.config.source.file = Some(file);
        self
    }

    pub fn source_headless(mut self, headless: bool) -> Self {
        self.config.source.headless = headless;
        self
    }

    // --- push ---

    pub fn push_token(mut self, token: impl Into<String>) -> Self {
        self.config.push.token = Some(token.into());
        self
    }

    pub fn push_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.push.endpoint = endpoint.into();
        self
    }

    pub fn push_title(mut self, title: impl Into<String>) -> Self {
        self.config.push.title = title.into();
        self
    }

    pub fn push_template(mut self, template: impl Into<String>) -> Self {
        self.config.push.template = template.into();
        self
    }

    // --- storage ---

    pub fn snapshot_path(mut self, path: PathBuf) -> Self {
        self.config.storage.snapshot_path = path;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    // -- Defaults --

    #[test]
    fn default_config_has_sensible_values() {
        let cfg = Config::default();
        assert!(cfg.account.username.is_empty());
        assert_eq!(cfg.monitor.interval_secs, 1800);
        assert_eq!(cfg.monitor.stop_check_millis, 1000);
        assert_eq!(cfg.source.kind, SourceKind::Command);
        assert!(cfg.source.command.is_none());
        assert!(cfg.source.headless);
        assert!(cfg.push.token.is_none());
        assert_eq!(cfg.push.endpoint, "http://www.pushplus.plus/send");
        assert_eq!(cfg.push.title, "Grade report updated");
        assert_eq!(cfg.push.template, "html");
        assert_eq!(cfg.push.timeout_secs, 15);
        assert!(cfg.storage.snapshot_path.ends_with("gradewatch/grade_history.json"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn default_config_only_lacks_a_source_command() {
        let errors = Config::default().validate();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["source.command"]);
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let yaml = r#"
account:
  username: "20300001"
  password: hunter2
monitor:
  interval_secs: 600
  stop_check_millis: 250
source:
  kind: command
  command: /usr/local/bin/fetch-grades
  args: ["--portal", "main"]
  headless: false
push:
  token: abcdef
  endpoint: https://push.example.com/send
  title: Grades
  template: markdown
  timeout_secs: 5
storage:
  snapshot_path: /tmp/grades.json
logging:
  level: debug
"#;
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.account.username, "20300001");
        assert_eq!(cfg.account.password, "hunter2");
        assert_eq!(cfg.monitor.interval_secs, 600);
        assert_eq!(cfg.monitor.stop_check_millis, 250);
        assert_eq!(cfg.source.command.as_deref(), Some("/usr/local/bin/fetch-grades"));
        assert_eq!(cfg.source.args, vec!["--portal", "main"]);
        assert!(!cfg.source.headless);
        assert_eq!(cfg.push.token(), Some("abcdef"));
        assert_eq!(cfg.push.endpoint, "https://push.example.com/send");
        assert_eq!(cfg.push.title, "Grades");
        assert_eq!(cfg.push.dialect(), MarkupDialect::Markdown);
        assert_eq!(cfg.push.timeout_secs, 5);
        assert_eq!(cfg.storage.snapshot_path, PathBuf::from("/tmp/grades.json"));
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.validate().is_empty());
        assert!(cfg.credentials().is_complete());
    }

    #[test]
    fn partial_yaml_uses_defaults_for_missing_sections() {
        let yaml = "push:\n  token: abc\nsource:\n  kind: file\n  file: /tmp/obs.json\n";
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.push.token(), Some("abc"));
        assert_eq!(cfg.push.endpoint, "http://www.pushplus.plus/send");
        assert_eq!(cfg.monitor.interval_secs, 1800);
        assert_eq!(cfg.source.kind, SourceKind::File);
        assert!(cfg.source.headless);
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn load_returns_error_on_invalid_yaml() {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(b"not: [valid: yaml: {{{").unwrap();
        tmp.flush().unwrap();

        let result = Config::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        let cfg = ConfigBuilder::new()
            .account("20300001", "pw")
            .monitor_interval_secs(60)
            .push_token("tok")
            .build();
        cfg.save(&path).expect("save config");

        let loaded = Config::load(&path).expect("reload config");
        assert_eq!(loaded.account.username, "20300001");
        assert_eq!(loaded.monitor.interval_secs, 60);
        assert_eq!(loaded.push.token(), Some("tok"));
    }

    // -- Validation --

    #[test]
    fn validate_catches_zero_intervals() {
        let mut cfg = Config::default();
        cfg.monitor.interval_secs = 0;
        cfg.monitor.stop_check_millis = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "monitor.interval_secs"));
        assert!(errors.iter().any(|e| e.field == "monitor.stop_check_millis"));
    }

    #[test]
    fn validate_requires_file_for_file_source() {
        let mut cfg = Config::default();
        cfg.source.kind = SourceKind::File;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "source.file"));
        assert!(!errors.iter().any(|e| e.field == "source.command"));
    }

    #[test]
    fn validate_rejects_blank_command() {
        let cfg = ConfigBuilder::new().source_command("   ").build();
        assert!(cfg.validate().iter().any(|e| e.field == "source.command"));
    }

    #[test]
    fn validate_catches_invalid_push_settings() {
        let cfg = ConfigBuilder::new()
            .source_command("fetch")
            .push_template("rtf")
            .push_endpoint("ftp://example.com")
            .build();
        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"push.template".to_string()));
        assert!(fields.contains(&"push.endpoint".to_string()));
    }

    #[test]
    fn validate_catches_invalid_log_level() {
        let mut cfg = Config::default();
        cfg.logging.level = "verbose".to_string();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "logging.level"));
    }

    #[test]
    fn validate_accepts_all_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let mut cfg = Config::default();
            cfg.logging.level = level.to_string();
            let errors = cfg.validate();
            assert!(
                !errors.iter().any(|e| e.field == "logging.level"),
                "level '{level}' should be valid"
            );
        }
    }

    #[test]
    fn validate_accepts_all_valid_templates() {
        for template in VALID_TEMPLATES {
            let cfg = ConfigBuilder::new()
                .source_command("fetch")
                .push_template(*template)
                .build();
            assert!(cfg.validate().is_empty(), "template '{template}' should be valid");
        }
    }

    // -- Push helpers --

    #[test]
    fn blank_token_counts_as_absent() {
        let cfg = ConfigBuilder::new().push_token("  ").build();
        assert_eq!(cfg.push.token(), None);
    }

    // -- Builder --

    #[test]
    fn builder_overrides_fields() {
        let cfg = ConfigBuilder::new()
            .account("20300001", "pw")
            .monitor_interval_secs(120)
            .monitor_stop_check_millis(500)
            .source_command("fetch-grades")
            .source_args(vec!["--fast".into()])
            .source_headless(false)
            .push_token("tok")
            .push_title("New grades")
            .push_template("txt")
            .snapshot_path(PathBuf::from("/tmp/s.json"))
            .logging_level("debug")
            .build();

        assert_eq!(cfg.monitor.interval_secs, 120);
        assert_eq!(cfg.monitor.stop_check_millis, 500);
        assert_eq!(cfg.source.command.as_deref(), Some("fetch-grades"));
        assert_eq!(cfg.source.args, vec!["--fast"]);
        assert!(!cfg.source.headless);
        assert_eq!(cfg.push.title, "New grades");
        assert_eq!(cfg.push.dialect(), MarkupDialect::Txt);
        assert_eq!(cfg.storage.snapshot_path, PathBuf::from("/tmp/s.json"));
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn builder_source_file_switches_kind() {
        let cfg = ConfigBuilder::new()
            .source_file(PathBuf::from("/tmp/obs.json"))
            .build_validated()
            .expect("file source config is valid");
        assert_eq!(cfg.source.kind, SourceKind::File);
    }

    #[test]
    fn builder_build_validated_fails_for_invalid_config() {
        let result = ConfigBuilder::new()
            .monitor_interval_secs(0)
            .logging_level("nope")
            .build_validated();
        let errors = result.unwrap_err();
        assert!(errors.len() >= 2);
    }

    // -- default_path --

    #[test]
    fn default_path_ends_with_config_yaml() {
        let p = Config::default_path();
        assert!(p.ends_with("gradewatch/config.yaml"));
    }

    #[test]
    fn account_debug_redacts_password() {
        let cfg = ConfigBuilder::new().account("20300001", "hunter2").build();
        assert!(!format!("{:?}", cfg.account).contains("hunter2"));
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "monitor.interval_secs".into(),
            message: "must be greater than 0".into(),
        };
        assert_eq!(err.to_string(), "monitor.interval_secs: must be greater than 0");
    }
}
