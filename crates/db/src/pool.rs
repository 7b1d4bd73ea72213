//! Connection pool for the atelier content database.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use crate::DbError;

/// Shared Postgres pool handed to every repository function.
pub type DbPool = PgPool;

/// Open a pool against `database_url` with at most `max_connections`
/// connections.  The API server and the sync engine share one pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, DbError> {
    info!("Connecting to the content database (max_connections={max_connections})");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Apply the embedded migrations — the content tables plus the `sync_runs`
/// bookkeeping table — from the workspace-root `migrations/` directory.
pub async fn run_migrations(pool: &DbPool) -> Result<(), DbError> {
    info!("Applying content schema migrations");
    sqlx::migrate!("../../migrations").run(pool).await?;
    Ok(())
}
