//! Artwork CRUD and sync upsert operations.

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    DbError,
    models::{ArtworkRow, NewArtwork},
};

const SELECT_COLS: &str = "id, external_id, title, artist_name, medium, dimensions, year, \
                           image_url, for_sale, published, created_at, updated_at";

/// Return artworks ordered by title.
///
/// `q` filters on a case-insensitive title substring; `published` filters on
/// the visibility flag.
pub async fn list_artworks(
    pool: &PgPool,
    q: Option<&str>,
    published: Option<bool>,
) -> Result<Vec<ArtworkRow>, DbError> {
    let rows = sqlx::query_as::<_, ArtworkRow>(&format!(
        r#"
        SELECT {SELECT_COLS} FROM artworks
        WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
          AND ($2::bool IS NULL OR published = $2)
        ORDER BY title ASC
        "#
    ))
    .bind(q.map(super::escape_like))
    .bind(published)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Fetch a single artwork by its primary key.
pub async fn get_artwork(pool: &PgPool, id: Uuid) -> Result<ArtworkRow, DbError> {
    let row = sqlx::query_as::<_, ArtworkRow>(&format!(
        "SELECT {SELECT_COLS} FROM artworks WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Insert a new artwork created via the admin API.
pub async fn create_artwork(pool: &PgPool, new: &NewArtwork) -> Result<ArtworkRow, DbError> {
    let row = sqlx::query_as::<_, ArtworkRow>(&format!(
        r#"
        INSERT INTO artworks
            (id, external_id, title, artist_name, medium, dimensions, year,
             image_url, for_sale, published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.title)
    .bind(&new.artist_name)
    .bind(&new.medium)
    .bind(&new.dimensions)
    .bind(new.year)
    .bind(&new.image_url)
    .bind(new.for_sale)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Replace every mutable field of an existing artwork.
pub async fn update_artwork(
    pool: &PgPool,
    id: Uuid,
    new: &NewArtwork,
) -> Result<ArtworkRow, DbError> {
    let row = sqlx::query_as::<_, ArtworkRow>(&format!(
        r#"
        UPDATE artworks
        SET title = $2, artist_name = $3, medium = $4, dimensions = $5, year = $6,
            image_url = $7, for_sale = $8, published = $9, updated_at = $10
        WHERE id = $1
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(id)
    .bind(&new.title)
    .bind(&new.artist_name)
    .bind(&new.medium)
    .bind(&new.dimensions)
    .bind(new.year)
    .bind(&new.image_url)
    .bind(new.for_sale)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_optional(pool)
    .await?
    .ok_or(DbError::NotFound)?;

    Ok(row)
}

/// Permanently delete an artwork by its primary key.
pub async fn delete_artwork(pool: &PgPool, id: Uuid) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM artworks WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }

    Ok(())
}

/// Insert-or-update keyed on `external_id` — the sync engine's write path.
pub async fn upsert_artwork(pool: &PgPool, new: &NewArtwork) -> Result<ArtworkRow, DbError> {
    let row = sqlx::query_as::<_, ArtworkRow>(&format!(
        r#"
        INSERT INTO artworks
            (id, external_id, title, artist_name, medium, dimensions, year,
             image_url, for_sale, published, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        ON CONFLICT (external_id) DO UPDATE
        SET title = EXCLUDED.title,
            artist_name = EXCLUDED.artist_name,
            medium = EXCLUDED.medium,
            dimensions = EXCLUDED.dimensions,
            year = EXCLUDED.year,
            image_url = EXCLUDED.image_url,
            for_sale = EXCLUDED.for_sale,
            published = EXCLUDED.published,
            updated_at = EXCLUDED.updated_at
        RETURNING {SELECT_COLS}
        "#
    ))
    .bind(Uuid::new_v4())
    .bind(&new.external_id)
    .bind(&new.title)
    .bind(&new.artist_name)
    .bind(&new.medium)
    .bind(&new.dimensions)
    .bind(new.year)
    .bind(&new.image_url)
    .bind(new.for_sale)
    .bind(new.published)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;

    Ok(row)
}
