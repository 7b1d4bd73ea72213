//! Admin CRUD for artists.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use db::models::{ArtistRow, NewArtist};
use db::repository::artists as repo;

use super::{ApiError, AppState, ListQuery};

#[derive(serde::Deserialize)]
pub struct ArtistDto {
    pub name: String,
    pub bio: Option<String>,
    pub discipline: Option<String>,
    pub photo_url: Option<String>,
    pub website: Option<String>,
    #[serde(default = "super::default_published")]
    pub published: bool,
}

impl ArtistDto {
    fn into_new(self) -> Result<NewArtist, ApiError> {
        if self.name.trim().is_empty() {
            return Err(ApiError::BadRequest("name must not be empty".into()));
        }
        Ok(NewArtist {
            external_id: None,
            name: self.name,
            bio: self.bio,
            discipline: self.discipline,
            photo_url: self.photo_url,
            website: self.website,
            published: self.published,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ArtistRow>>, ApiError> {
    let rows = repo::list_artists(&state.pool, params.q.as_deref(), params.published).await?;
    Ok(Json(rows))
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ArtistRow>, ApiError> {
    Ok(Json(repo::get_artist(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ArtistDto>,
) -> Result<(StatusCode, Json<ArtistRow>), ApiError> {
    let row = repo::create_artist(&state.pool, &payload.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<ArtistDto>,
) -> Result<Json<ArtistRow>, ApiError> {
    let row = repo::update_artist(&state.pool, id, &payload.into_new()?).await?;
    Ok(Json(row))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    repo::delete_artist(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
