//! Grade source port (driven/secondary port)
//!
//! The acquisition collaborator: whatever logs into the student portal and
//! scrapes the grade sheet. Its mechanics (browser automation, markup
//! parsing) are deliberately invisible to the core.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because failures are adapter-specific and the
//!   core treats every failure the same way: no observation this round.
//! - No timeout is imposed by the caller; an unresponsive source stalls the
//!   polling loop.

use serde::{Deserialize, Serialize};

use crate::domain::Observation;

/// Portal login credentials handed to the grade source
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Both fields are non-blank
    pub fn is_complete(&self) -> bool {
        !self.username.trim().is_empty() && !self.password.is_empty()
    }
}

// Keep the password out of logs and panic messages.
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Port trait for obtaining a fresh observation
#[async_trait::async_trait]
pub trait IGradeSource: Send + Sync {
    /// Performs one acquisition attempt
    ///
    /// # Arguments
    /// * `credentials` - Login credentials for the portal
    async fn acquire(&self, credentials: &Credentials) -> anyhow::Result<Observation>;

    /// Short name used in logs (e.g. "command", "file")
    fn name(&self) -> &str;
}
