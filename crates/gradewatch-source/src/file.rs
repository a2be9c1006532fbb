//! Observation file adapter
//!
//! Reads an observation from a JSON file that some other process keeps up
//! to date. Credentials are ignored.

use std::path::{Path, PathBuf};

use gradewatch_core::{
    domain::Observation,
    ports::{Credentials, IGradeSource},
};
use tracing::debug;

use crate::{output::parse_observation, SourceError};

/// Grade source reading a JSON file on every round
#[derive(Debug, Clone)]
pub struct FileGradeSource {
    path: PathBuf,
}

impl FileGradeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file
    pub async fn read(&self) -> Result<Observation, SourceError> {
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| SourceError::Io {
                path: self.path.clone(),
                source,
            })?;
        let observation = parse_observation(&text)?;
        debug!(path = %self.path.display(), courses = observation.course_count(), "Read observation file");
        Ok(observation)
    }
}

#[async_trait::async_trait]
impl IGradeSource for FileGradeSource {
    async fn acquire(&self, _credentials: &Credentials) -> anyhow::Result<Observation> {
        Ok(self.read().await?)
    }

    fn name(&self) -> &str {
        "file"
    }
}
