//! GradeWatch Store - Snapshot persistence
//!
//! Keeps the last successfully acquired observation in a single
//! human-readable JSON file, by default
//! `~/.local/share/gradewatch/grade_history.json` (see `StorageConfig`).
//!
//! Writes go to a sibling temporary file that is then renamed over the
//! target, so a reader sees either the old record or the new one, never a
//! partial write.

use std::path::{Path, PathBuf};

use gradewatch_core::{
    domain::{Observation, SnapshotError},
    ports::ISnapshotStore,
};
use tracing::{debug, instrument};

/// Snapshot store backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    /// Creates a store that reads and writes `path`
    ///
    /// Neither the file nor its parent directory needs to exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the snapshot file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut p = self.path.as_os_str().to_owned();
        p.push(".tmp");
        PathBuf::from(p)
    }

    fn io_error(&self, source: std::io::Error) -> SnapshotError {
        SnapshotError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait::async_trait]
impl ISnapshotStore for JsonSnapshotStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Result<Option<Observation>, SnapshotError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No snapshot on disk yet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let observation: Observation =
            serde_json::from_str(&content).map_err(|source| SnapshotError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(courses = observation.course_count(), "Snapshot loaded");
        Ok(Some(observation))
    }

    #[instrument(skip(self, observation), fields(path = %self.path.display()))]
    async fn save(&self, observation: &Observation) -> Result<(), SnapshotError> {
        let data = serde_json::to_vec_pretty(observation).map_err(SnapshotError::Serialize)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| self.io_error(e))?;
            }
        }

        let tmp_path = self.tmp_path();
        debug!(?tmp_path, "writing to temporary file");
        tokio::fs::write(&tmp_path, &data)
            .await
            .map_err(|e| self.io_error(e))?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(self.io_error(e));
        }

        debug!(courses = observation.course_count(), "Snapshot saved");
        Ok(())
    }
}
