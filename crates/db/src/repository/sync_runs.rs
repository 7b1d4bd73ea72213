//! Sync run bookkeeping.
//!
//! The engine opens a `sync_runs` row in `running` status before touching a
//! table and finalises it exactly once with counts and a terminal status.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{SyncRunRow, SyncRunStatus};
use crate::DbError;

const SELECT_COLS: &str =
    "id, entity, status, fetched, upserted, failed, error, started_at, finished_at";

/// Create a new sync run record in `running` status.
pub async fn create_run(pool: &PgPool, entity: &str) -> Result<SyncRunRow, DbError> {
    let row = sqlx::query_as::<_, SyncRunRow>(&format!(
        r#"
        INSERT INTO sync_runs (id, entity, status, fetched, upserted, failed, started_at)
        VALUES ($1, $2, $3, 0, 0, 0, $4)
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(entity)
    .bind(SyncRunStatus::Running.to_string())
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Finalise a sync run with its counts and terminal status.
pub async fn finish_run(
    pool: &PgPool,
    run_id: Uuid,
    status: SyncRunStatus,
    fetched: i32,
    upserted: i32,
    failed: i32,
    error: Option<&str>,
) -> Result<(), DbError> {
    sqlx::query(
        r#"
        UPDATE sync_runs
        SET status = $2, fetched = $3, upserted = $4, failed = $5, error = $6, finished_at = $7
        WHERE id = $1
        "#,
    )
    .bind(run_id)
    .bind(status.to_string())
    .bind(fetched)
    .bind(upserted)
    .bind(failed)
    .bind(error)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

/// Return the most recent sync runs (newest first).
pub async fn list_recent_runs(pool: &PgPool, limit: i64) -> Result<Vec<SyncRunRow>, DbError> {
    let rows = sqlx::query_as::<_, SyncRunRow>(&format!(
        "SELECT {SELECT_COLS} FROM sync_runs ORDER BY started_at DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
