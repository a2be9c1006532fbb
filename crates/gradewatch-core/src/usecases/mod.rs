//! Use cases (interactors) for GradeWatch
//!
//! Use cases are thin coordinators that delegate business rules to domain
//! functions and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`NotifyChangesUseCase`] - Message rendering and push dispatch
//! - [`ProcessObservationUseCase`] - Diff, persist and notify for one round

pub mod notify_changes;
pub mod process_observation;

pub use notify_changes::{
    format_entry, format_report, DispatchOutcome, NotifyChangesUseCase, SkipReason, DEFAULT_TITLE,
};
pub use process_observation::{ProcessObservationUseCase, RoundOutcome};
