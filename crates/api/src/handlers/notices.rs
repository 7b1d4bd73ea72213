//! Admin CRUD for notices.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use uuid::Uuid;

use db::models::{NewNotice, NoticeRow};
use db::repository::notices as repo;

use super::{ApiError, AppState, ListQuery};

#[derive(serde::Deserialize)]
pub struct NoticeDto {
    pub title: String,
    pub body: Option<String>,
    pub posted_on: Option<NaiveDate>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default = "super::default_published")]
    pub published: bool,
}

impl NoticeDto {
    fn into_new(self) -> Result<NewNotice, ApiError> {
        if self.title.trim().is_empty() {
            return Err(ApiError::BadRequest("title must not be empty".into()));
        }
        Ok(NewNotice {
            external_id: None,
            title: self.title,
            body: self.body,
            posted_on: self.posted_on,
            pinned: self.pinned,
            published: self.published,
        })
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
) -> Result<Json<Vec<NoticeRow>>, ApiError> {
    let rows = repo::list_notices(&state.pool, params.q.as_deref(), params.published).await?;
    Ok(Json(rows))
}

pub async fn get(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<Json<NoticeRow>, ApiError> {
    Ok(Json(repo::get_notice(&state.pool, id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<NoticeDto>,
) -> Result<(StatusCode, Json<NoticeRow>), ApiError> {
    let row = repo::create_notice(&state.pool, &payload.into_new()?).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

pub async fn update(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
    Json(payload): Json<NoticeDto>,
) -> Result<Json<NoticeRow>, ApiError> {
    let row = repo::update_notice(&state.pool, id, &payload.into_new()?).await?;
    Ok(Json(row))
}

pub async fn delete(
    Path(id): Path<Uuid>,
    State(state): State<AppState>,
) -> Result<StatusCode, ApiError> {
    repo::delete_notice(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
