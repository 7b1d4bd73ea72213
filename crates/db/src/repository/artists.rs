//! Artist CRUD and sync upsert operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{ArtistRow, NewArtist},
};

const SELECT_COLS: &str =
    "id, external_id, name, bio, discipline, photo_url, website, published, created_at, updated_at";

/// Return artists ordered by name.
///
/// `q` filters on a case-insensitive name substring; `published` filters on
/// the visibility flag.  Either may be `None` to skip that filter.
pub async fn list_artists(
    pool: &PgPool,
    q: Option<&str>,
    published: Option<bool>,
) -> Result<Vec<ArtistRow>, DbError> {
    let rows = sqlx::query_as::<_, ArtistRow>(&format!(
        r#"
        SELECT {SELECT_COLS} FROM artists
        WHERE ($1::text IS NULL OR name ILIKE '%' || $1 || '%')
          AND ($2::bool IS NULL OR published = $2)
        ORDER BY name ASC
        "#
    ))
    .bind(q.map(super::escape_like))
    .bind(published)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch a single artist by its primary key.
pub async fn get_artist(pool: &PgPool, id: Uuid) -> Result<ArtistRow, DbError> {
    let row = sqlx::query_as::<_, ArtistRow>(&format!(
        "SELECT {SELECT_COLS} FROM artists WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Insert a new artist created via the admin API.
pub async fn create_artist(pool: &PgPool, new: &NewArtist) -> Result<ArtistRow, DbError> {
    let row = sqlx::query_as::<_, ArtistRow>(&format!(
        r#"
        INSERT INTO artists
            (id, external_id, name, bio, discipline, photo_url, website, published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.name)
    .bind(&new.bio)
    .bind(&new.discipline)
    .bind(&new.photo_url)
    .bind(&new.website)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Replace every mutable field of an existing artist.
///
/// Returns `DbError::NotFound` if the row doesn't exist.
pub async fn update_artist(pool: &PgPool, id: Uuid, new: &NewArtist) -> Result<ArtistRow, DbError> {
    let row = sqlx::query_as::<_, ArtistRow>(&format!(
        r#"
        UPDATE artists
        SET name = $2, bio = $3, discipline = $4, photo_url = $5,
            website = $6, published = $7, updated_at = $8
        WHERE id = $1
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(id)
    .bind(&new.name)
    .bind(&new.bio)
    .bind(&new.discipline)
    .bind(&new.photo_url)
    .bind(&new.website)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Permanently delete an artist by its primary key.
pub async fn delete_artist(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM artists WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Insert-or-update keyed on `external_id` — the sync engine's write path.
///
/// Re-running with identical source data leaves the table unchanged apart
/// from `updated_at`.
pub async fn upsert_artist(pool: &PgPool, new: &NewArtist) -> Result<ArtistRow, DbError> {
    let row = sqlx::query_as::<_, ArtistRow>(&format!(
        r#"
        INSERT INTO artists
            (id, external_id, name, bio, discipline, photo_url, website, published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        ON CONFLICT (external_id) DO UPDATE
        SET name = EXCLUDED.name,
            bio = EXCLUDED.bio,
            discipline = EXCLUDED.discipline,
            photo_url = EXCLUDED.photo_url,
            website = EXCLUDED.website,
            published = EXCLUDED.published,
            updated_at = EXCLUDED.updated_at
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.name)
    .bind(&new.bio)
    .bind(&new.discipline)
    .bind(&new.photo_url)
    .bind(&new.website)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
