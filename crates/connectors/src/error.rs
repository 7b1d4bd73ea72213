//! Source-level error type.

use thiserror::Error;

/// Errors returned by a record source's `fetch_page` method.
///
/// The engine uses the variant to decide retry behaviour:
/// - `Retryable` — the page fetch is re-attempted with exponential back-off.
/// - `Fatal`     — the entity's sync run is immediately marked as failed.
#[derive(Debug, Error, Clone)]
pub enum SourceError {
    /// Transient failure (rate limit, 5xx, transport); the engine should retry.
    #[error("retryable source error: {0}")]
    Retryable(String),

    /// Permanent failure (bad credentials, unknown table); no retry.
    #[error("fatal source error: {0}")]
    Fatal(String),
}
