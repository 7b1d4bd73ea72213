//! Admin CRUD for events.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use db::models::{EventRow, NewEvent};
use db::repository::events as repo;

use super::{ApiError, AppState, ListQuery};

#[derive(serde::Deserialize)]
pub struct EventDto {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default = "super::default_published")]
    pub published: bool,
}

impl EventDto {
    fn into_new(self) -> Result<NewEvent, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".into()));
        }
        if let (Some(starts), Some(ends)) = (self.starts_at, self.ends_at) {
            if ends < starts {
                return Err(ApiError::BadRequest("ends_at precedes starts_at".into()));
            }
        }
        Ok(NewEvent {
            external_id: None,
            title: self.title,
            description: self.description,
            location: self.location,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            published: self.published,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<EventRow>>, ApiError> {
    let rows = repo::list_events(&state.pool, params.q.as_deref(), params.published).await?;
    Ok(Json(rows))
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<EventRow>, ApiError> {
    Ok(Json(repo::get_event(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<EventDto>,
) -> Result<(StatusCode, Json<EventRow>), ApiError> {
    let row = repo::create_event(&state.pool, &payload.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<EventDto>,
) -> Result<Json<EventRow>, ApiError> {
    let row = repo::update_event(&state.pool, id, &payload.into_new()?).await?;
    Ok(Json(row))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    repo::delete_event(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
