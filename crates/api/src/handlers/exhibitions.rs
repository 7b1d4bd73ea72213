//! Admin CRUD for exhibitions.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use uuid::Uuid;

use db::models::{ExhibitionRow, NewExhibition};
use db::repository::exhibitions as repo;

use super::{ApiError, AppState, ListQuery};

#[derive(serde::Deserialize)]
pub struct ExhibitionDto {
    pub title: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub starts_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub image_url: Option<String>,
    #[serde(default = "super::default_published")]
    pub published: bool,
}

impl ExhibitionDto {
    fn into_new(self) -> Result<NewExhibition, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".into()));
        }
        if let (Some(starts), Some(ends)) = (self.starts_on, self.ends_on) {
            if ends < starts {
                return Err(ApiError::BadRequest("ends_on precedes starts_on".into()));
            }
        }
        Ok(NewExhibition {
            external_id: None,
            title: self.title,
            description: self.description,
            venue: self.venue,
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            image_url: self.image_url,
            published: self.published,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<ExhibitionRow>>, ApiError> {
    let rows = repo::list_exhibitions(&state.pool, params.q.as_deref(), params.published).await?;
    Ok(Json(rows))
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<ExhibitionRow>, ApiError> {
    Ok(Json(repo::get_exhibition(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ExhibitionDto>,
) -> Result<(StatusCode, Json<ExhibitionRow>), ApiError> {
    let row = repo::create_exhibition(&state.pool, &payload.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<ExhibitionDto>,
) -> Result<Json<ExhibitionRow>, ApiError> {
    let row = repo::update_exhibition(&state.pool, id, &payload.into_new()?).await?;
    Ok(Json(row))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    repo::delete_exhibition(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
