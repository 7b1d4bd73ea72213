//! Error type shared by every repository function.

use thiserror::Error;

/// Persistence failure surfaced to the engine and API crates.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// No row matched the requested ID; the API maps this to 404.
    #[error("row not found")]
    NotFound,

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}
