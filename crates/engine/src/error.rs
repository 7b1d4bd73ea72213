//! Engine-level error types.

use thiserror::Error;

/// Errors produced by the sync engine and the re-sync controller.
#[derive(Debug, Error)]
pub enum EngineError {
    // ------ Sync errors ------

    /// The source failed fatally; the entity's run is aborted.
    #[error("source error for table '{table}': {source}")]
    Source {
        table: String,
        source: connectors::SourceError,
    },

    /// A page fetch kept failing transiently until the retry budget ran out.
    #[error("table '{table}' exceeded retry limit: {message}")]
    RetryExhausted { table: String, message: String },

    /// Persistence error from the db crate.
    #[error("database error: {0}")]
    Database(#[from] db::DbError),

    // ------ Controller errors ------

    /// `start` was called while the periodic loop is already running.
    #[error("periodic sync is already running")]
    AlreadyRunning,

    /// `stop` was called with no periodic loop running.
    #[error("periodic sync is not running")]
    NotRunning,

    /// A manual sync was requested while another sync is executing.
    #[error("a sync is already in flight")]
    SyncInFlight,
}
