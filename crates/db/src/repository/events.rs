//! Event CRUD and sync upsert operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{EventRow, NewEvent},
};

const SELECT_COLS: &str = "id, external_id, title, description, location, starts_at, ends_at, \
                           published, created_at, updated_at";

/// Return events ordered by start time (soonest first, undated last).
pub async fn list_events(
    pool: &PgPool,
    q: Option<&str>,
    published: Option<bool>,
) -> Result<Vec<EventRow>, DbError> {
    let rows = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        SELECT {SELECT_COLS} FROM events
        WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
          AND ($2::bool IS NULL OR published = $2)
        ORDER BY starts_at ASC NULLS LAST, title ASC
        "#
    ))
    .bind(q.map(super::escape_like))
    .bind(published)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch a single event by its primary key.
pub async fn get_event(pool: &PgPool, id: Uuid) -> Result<EventRow, DbError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        "SELECT {SELECT_COLS} FROM events WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Insert a new event created via the admin API.
pub async fn create_event(pool: &PgPool, new: &NewEvent) -> Result<EventRow, DbError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        INSERT INTO events
            (id, external_id, title, description, location, starts_at, ends_at,
             published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.location)
    .bind(new.starts_at)
    .bind(new.ends_at)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Replace every mutable field of an existing event.
pub async fn update_event(pool: &PgPool, id: Uuid, new: &NewEvent) -> Result<EventRow, DbError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        UPDATE events
        SET title = $2, description = $3, location = $4, starts_at = $5,
            ends_at = $6, published = $7, updated_at = $8
        WHERE id = $1
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.location)
    .bind(new.starts_at)
    .bind(new.ends_at)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Permanently delete an event by its primary key.
pub async fn delete_event(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM events WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Insert-or-update keyed on `external_id` — the sync engine's write path.
pub async fn upsert_event(pool: &PgPool, new: &NewEvent) -> Result<EventRow, DbError> {
    let row = sqlx::query_as::<_, EventRow>(&format!(
        r#"
        INSERT INTO events
            (id, external_id, title, description, location, starts_at, ends_at,
             published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        ON CONFLICT (external_id) DO UPDATE
        SET title = EXCLUDED.title,
            description = EXCLUDED.description,
            location = EXCLUDED.location,
            starts_at = EXCLUDED.starts_at,
            ends_at = EXCLUDED.ends_at,
            published = EXCLUDED.published,
            updated_at = EXCLUDED.updated_at
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.location)
    .bind(new.starts_at)
    .bind(new.ends_at)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
