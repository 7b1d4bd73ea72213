//! Admin CRUD for artworks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use db::models::{ArtworkRow, NewArtwork};
use db::repository::artworks as repo;

use super::{ApiError, AppState, ListQuery};

#[derive(serde::Deserialize)]
pub struct ArtworkDto {
    pub title: String,
    pub artist_name: Option<String>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub year: Option<i32>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub for_sale: bool,
    #[serde(default = "super::default_published")]
    pub published: bool,
}

impl ArtworkDto {
    fn into_new(self) -> Result<NewArtwork, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".into()));
        }
        Ok(NewArtwork {
            external_id: None,
            title: self.title,
            artist_name: self.artist_name,
            medium: self.medium,
            dimensions: self.dimensions,
            year: self.year,
            image_url: self.image_url,
            for_sale: self.for_sale,
            published: self.published,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ArtworkRow>>, ApiError> {
    let rows = repo::list_artworks(&state.pool, params.q.as_deref(), params.published).await?;
    Ok(Json(rows))
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ArtworkRow>, ApiError> {
    Ok(Json(repo::get_artwork(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ArtworkDto>,
) -> Result<(StatusCode, Json<ArtworkRow>), ApiError> {
    let row = repo::create_artwork(&state.pool, &payload.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<ArtworkDto>,
) -> Result<Json<ArtworkRow>, ApiError> {
    let row = repo::update_artwork(&state.pool, id, &payload.into_new()?).await?;
    Ok(Json(row))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    repo::delete_artwork(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
