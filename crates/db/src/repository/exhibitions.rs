//! Exhibition CRUD and sync upsert operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{ExhibitionRow, NewExhibition},
};

const SELECT_COLS: &str = "id, external_id, title, description, venue, starts_on, ends_on, \
                           image_url, published, created_at, updated_at";

/// Return exhibitions ordered by start date (most recent first, undated last).
pub async fn list_exhibitions(
    pool: &PgPool,
    q: Option<&str>,
    published: Option<bool>,
) -> Result<Vec<ExhibitionRow>, DbError> {
    let rows = sqlx::query_as::<_, ExhibitionRow>(&format!(
        r#"
        SELECT {SELECT_COLS} FROM exhibitions
        WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
          AND ($2::bool IS NULL OR published = $2)
        ORDER BY starts_on DESC NULLS LAST, title ASC
        "#
    ))
    .bind(q.map(super::escape_like))
    .bind(published)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch a single exhibition by its primary key.
pub async fn get_exhibition(pool: &PgPool, id: Uuid) -> Result<ExhibitionRow, DbError> {
    let row = sqlx::query_as::<_, ExhibitionRow>(&format!(
        "SELECT {SELECT_COLS} FROM exhibitions WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Insert a new exhibition created via the admin API.
pub async fn create_exhibition(
    pool: &PgPool,
    new: &NewExhibition,
) -> Result<ExhibitionRow, DbError> {
    let row = sqlx::query_as::<_, ExhibitionRow>(&format!(
        r#"
        INSERT INTO exhibitions
            (id, external_id, title, description, venue, starts_on, ends_on,
             image_url, published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.venue)
    .bind(new.starts_on)
    .bind(new.ends_on)
    .bind(&new.image_url)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Replace every mutable field of an existing exhibition.
pub async fn update_exhibition(
    pool: &PgPool,
    id: Uuid,
    new: &NewExhibition,
) -> Result<ExhibitionRow, DbError> {
    let row = sqlx::query_as::<_, ExhibitionRow>(&format!(
        r#"
        UPDATE exhibitions
        SET title = $2, description = $3, venue = $4, starts_on = $5, ends_on = $6,
            image_url = $7, published = $8, updated_at = $9
        WHERE id = $1
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.venue)
    .bind(new.starts_on)
    .bind(new.ends_on)
    .bind(&new.image_url)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Permanently delete an exhibition by its primary key.
pub async fn delete_exhibition(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM exhibitions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Insert-or-update keyed on `external_id` — the sync engine's write path.
pub async fn upsert_exhibition(
    pool: &PgPool,
    new: &NewExhibition,
) -> Result<ExhibitionRow, DbError> {
    let row = sqlx::query_as::<_, ExhibitionRow>(&format!(
        r#"
        INSERT INTO exhibitions
            (id, external_id, title, description, venue, starts_on, ends_on,
             image_url, published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
        ON CONFLICT (external_id) DO UPDATE
        SET title = EXCLUDED.title,
            description = EXCLUDED.description,
            venue = EXCLUDED.venue,
            starts_on = EXCLUDED.starts_on,
            ends_on = EXCLUDED.ends_on,
            image_url = EXCLUDED.image_url,
            published = EXCLUDED.published,
            updated_at = EXCLUDED.updated_at
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.venue)
    .bind(new.starts_on)
    .bind(new.ends_on)
    .bind(&new.image_url)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
