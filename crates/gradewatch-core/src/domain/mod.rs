//! Domain entities and business logic
//!
//! This module contains the core domain types for GradeWatch:
//! - The acquired [`Observation`] (also the persisted snapshot record)
//! - Grade descriptor helpers
//! - The [`ChangeReport`] and the [`compare`] diff engine
//! - Domain-specific error types

pub mod errors;
pub mod grade;
pub mod observation;
pub mod report;

// Re-export commonly used types
pub use errors::SnapshotError;
pub use grade::{compose_grade, split_grade, GRADE_SEPARATOR};
pub use observation::{Observation, UNKNOWN};
pub use report::{compare, ChangeEntry, ChangeKind, ChangeReport};
