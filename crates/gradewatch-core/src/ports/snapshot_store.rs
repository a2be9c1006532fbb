//! Snapshot store port (driven/secondary port)
//!
//! Persists the last successfully acquired [`Observation`]. The store owns
//! the record exclusively; nothing else writes it.
//!
//! ## Design Notes
//!
//! - Uses the typed [`SnapshotError`] rather than `anyhow` so callers can
//!   distinguish a missing snapshot (`Ok(None)`) from a corrupt record or
//!   an I/O failure.
//! - [`ISnapshotStore::load_or_none`] is the forgiving read used by the
//!   polling loop: every failure collapses to "no prior data".
//! - `save` must fully replace the prior record such that a concurrent
//!   reader never sees a partial write.

use tracing::warn;

use crate::domain::{Observation, SnapshotError};

/// Port trait for snapshot persistence
#[async_trait::async_trait]
pub trait ISnapshotStore: Send + Sync {
    /// Reads the stored snapshot
    ///
    /// Returns `Ok(None)` when no snapshot has been written yet.
    async fn load(&self) -> Result<Option<Observation>, SnapshotError>;

    /// Replaces the stored snapshot with `observation`
    async fn save(&self, observation: &Observation) -> Result<(), SnapshotError>;

    /// Reads the stored snapshot, treating any failure as "no prior data"
    async fn load_or_none(&self) -> Option<Observation> {
        match self.load().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, corrupt = e.is_corrupt(), "Ignoring unreadable snapshot");
                None
            }
        }
    }
}
