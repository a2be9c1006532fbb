//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. The core depends on these interfaces; their
//! implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IGradeSource`] - Acquisition of a fresh observation (scraper)
//! - [`ISnapshotStore`] - Persistence of the last known observation
//! - [`IPushService`] - Delivery of push notifications

pub mod grade_source;
pub mod push_service;
pub mod snapshot_store;

pub use grade_source::{Credentials, IGradeSource};
pub use push_service::{IPushService, MarkupDialect, PushRequest};
pub use snapshot_store::ISnapshotStore;
