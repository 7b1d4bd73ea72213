//! `engine` crate — field mapping, the sync engine, and the periodic
//! re-sync controller.

pub mod models;
pub mod error;
pub mod mapper;
pub mod fetch;
pub mod sync;
pub mod scheduler;

pub use models::{EntityKind, SyncOutcome, SyncReport, SyncSummary};
pub use error::EngineError;
pub use sync::{SyncConfig, SyncEngine};
pub use scheduler::{SyncService, SyncStatus};

#[cfg(test)]
mod engine_tests;
