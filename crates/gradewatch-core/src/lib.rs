//! GradeWatch Core - Domain logic and business rules
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain entities** - `Observation`, `ChangeReport`, grade descriptors
//! - **Diff engine** - [`domain::compare`], exact-string change detection
//! - **Port definitions** - Traits for adapters: `IGradeSource`, `ISnapshotStore`, `IPushService`
//! - **Use cases** - `NotifyChangesUseCase`, `ProcessObservationUseCase`
//!
//! # Architecture
//!
//! The domain module contains pure logic with no I/O. Ports define the trait
//! interfaces that adapter crates implement (snapshot file, push endpoint,
//! scraper). Use cases orchestrate one polling round through those ports.

pub mod config;
pub mod domain;
pub mod ports;
pub mod usecases;
