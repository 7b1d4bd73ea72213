//! Handler modules plus the shared state and error envelope.
//!
//! Every failure that escapes a handler is serialised into one JSON shape:
//! `{"error": {"status": <u16>, "message": <string>}}` with the matching
//! HTTP status.  Internal details are logged, never leaked.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

use db::{DbError, DbPool};
use engine::{EngineError, SyncService};

pub mod artists;
pub mod artworks;
pub mod exhibitions;
pub mod events;
pub mod notices;
pub mod sync;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub sync: Arc<SyncService>,
}

/// Serde default for DTO `published` fields.
pub(crate) fn default_published() -> bool {
    true
}

/// Common query parameters for entity list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring filter on the entity's title/name column.
    pub q: Option<String>,
    /// Filter on the visibility flag.
    pub published: Option<bool>,
}

// ---------------------------------------------------------------------------
// Error envelope
// ---------------------------------------------------------------------------

/// API-boundary error; becomes the JSON error envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("internal server error")]
    Internal,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": {
                "status": status.as_u16(),
                "message": self.to_string(),
            }
        }));
        (status, body).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound => Self::NotFound,
            other => {
                error!("database error: {other}");
                Self::Internal
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::AlreadyRunning | EngineError::NotRunning | EngineError::SyncInFlight => {
                Self::Conflict(e.to_string())
            }
            other => {
                error!("engine error: {other}");
                Self::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn envelope(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_uses_the_envelope_shape() {
        let (status, body) = envelope(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["status"], 404);
        assert_eq!(body["error"]["message"], "not found");
    }

    #[tokio::test]
    async fn bad_request_carries_its_message() {
        let (status, body) = envelope(ApiError::BadRequest("name must not be empty".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "name must not be empty");
    }

    #[tokio::test]
    async fn internal_errors_stay_generic() {
        let (status, body) = envelope(ApiError::Internal).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "internal server error");
    }

    #[tokio::test]
    async fn row_not_found_maps_to_404() {
        let (status, _) = envelope(ApiError::from(DbError::NotFound)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn controller_conflicts_map_to_409() {
        let (status, body) = envelope(ApiError::from(EngineError::SyncInFlight)).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["status"], 409);
    }
}
