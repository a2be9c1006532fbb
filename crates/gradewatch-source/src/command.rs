//! External scraper command adapter
//!
//! Runs a user-supplied program that logs into the portal and prints the
//! grade sheet as JSON on stdout (see [`crate::output`]). Credentials are
//! passed through the environment, never on the command line:
//!
//! | Variable | Value |
//! |---|---|
//! | `GRADEWATCH_USERNAME` | student ID |
//! | `GRADEWATCH_PASSWORD` | portal password |
//! | `GRADEWATCH_HEADLESS` | `1` to hide the browser window, `0` to show it |

use std::process::Stdio;

use gradewatch_core::{
    domain::Observation,
    ports::{Credentials, IGradeSource},
};
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use crate::{output::parse_observation, SourceError};

pub const ENV_USERNAME: &str = "GRADEWATCH_USERNAME";
pub const ENV_PASSWORD: &str = "GRADEWATCH_PASSWORD";
pub const ENV_HEADLESS: &str = "GRADEWATCH_HEADLESS";

/// Maximum number of stderr characters kept in a [`SourceError::Failed`]
const MAX_STDERR: usize = 1024;

/// Grade source that shells out to a scraper program
#[derive(Debug, Clone)]
pub struct CommandGradeSource {
    program: String,
    args: Vec<String>,
    headless: bool,
}

impl CommandGradeSource {
    /// Creates a source running `program` with no extra arguments in
    /// headless mode
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            headless: true,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Runs the scraper once and parses its output
    #[instrument(skip(self, credentials), fields(program = %self.program))]
    pub async fn run(&self, credentials: &Credentials) -> Result<Observation, SourceError> {
        debug!(args = ?self.args, headless = self.headless, "Starting scraper");

        let output = Command::new(&self.program)
            .args(&self.args)
            .env(ENV_USERNAME, &credentials.username)
            .env(ENV_PASSWORD, &credentials.password)
            .env(ENV_HEADLESS, if self.headless { "1" } else { "0" })
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| SourceError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() {
            warn!(status = ?output.status.code(), "Scraper failed");
            return Err(SourceError::Failed {
                status: output.status.code(),
                stderr: stderr.trim().chars().take(MAX_STDERR).collect(),
            });
        }
        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "Scraper diagnostics");
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let observation = parse_observation(&stdout)?;
        info!(
            courses = observation.course_count(),
            gpa = %observation.gpa(),
            "Scraper returned observation"
        );
        Ok(observation)
    }
}

#[async_trait::async_trait]
impl IGradeSource for CommandGradeSource {
    async fn acquire(&self, credentials: &Credentials) -> anyhow::Result<Observation> {
        Ok(self.run(credentials).await?)
    }

    fn name(&self) -> &str {
        "command"
    }
}
