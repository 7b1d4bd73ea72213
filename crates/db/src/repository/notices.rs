//! Notice CRUD and sync upsert operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{NewNotice, NoticeRow},
};

const SELECT_COLS: &str =
    "id, external_id, title, body, posted_on, pinned, published, created_at, updated_at";

/// Return notices with pinned ones first, then newest first.
pub async fn list_notices(
    pool: &PgPool,
    q: Option<&str>,
    published: Option<bool>,
) -> Result<Vec<NoticeRow>, DbError> {
    let rows = sqlx::query_as::<_, NoticeRow>(&format!(
        r#"
        SELECT {SELECT_COLS} FROM notices
        WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
          AND ($2::bool IS NULL OR published = $2)
        ORDER BY pinned DESC, posted_on DESC NULLS LAST, title ASC
        "#
    ))
    .bind(q.map(super::escape_like))
    .bind(published)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch a single notice by its primary key.
pub async fn get_notice(pool: &PgPool, id: Uuid) -> Result<NoticeRow, DbError> {
    let row = sqlx::query_as::<_, NoticeRow>(&format!(
        "SELECT {SELECT_COLS} FROM notices WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Insert a new notice created via the admin API.
pub async fn create_notice(pool: &PgPool, new: &NewNotice) -> Result<NoticeRow, DbError> {
    let row = sqlx::query_as::<_, NoticeRow>(&format!(
        r#"
        INSERT INTO notices
            (id, external_id, title, body, posted_on, pinned, published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.title)
    .bind(&new.body)
    .bind(new.posted_on)
    .bind(new.pinned)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Replace every mutable field of an existing notice.
pub async fn update_notice(pool: &PgPool, id: Uuid, new: &NewNotice) -> Result<NoticeRow, DbError> {
    let row = sqlx::query_as::<_, NoticeRow>(&format!(
        r#"
        UPDATE notices
        SET title = $2, body = $3, posted_on = $4, pinned = $5, published = $6, updated_at = $7
        WHERE id = $1
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(id)
    .bind(&new.title)
    .bind(&new.body)
    .bind(new.posted_on)
    .bind(new.pinned)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Permanently delete a notice by its primary key.
pub async fn delete_notice(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM notices WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Insert-or-update keyed on `external_id` — the sync engine's write path.
pub async fn upsert_notice(pool: &PgPool, new: &NewNotice) -> Result<NoticeRow, DbError> {
    let row = sqlx::query_as::<_, NoticeRow>(&format!(
        r#"
        INSERT INTO notices
            (id, external_id, title, body, posted_on, pinned, published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
        ON CONFLICT (external_id) DO UPDATE
        SET title = EXCLUDED.title,
            body = EXCLUDED.body,
            posted_on = EXCLUDED.posted_on,
            pinned = EXCLUDED.pinned,
            published = EXCLUDED.published,
            updated_at = EXCLUDED.updated_at
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.title)
    .bind(&new.body)
    .bind(new.posted_on)
    .bind(new.pinned)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
