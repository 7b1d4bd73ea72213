//! Sync control endpoints — run, start/stop the periodic loop, status, runs.

use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use db::models::SyncRunRow;
use db::repository::sync_runs as runs_repo;
use engine::{EntityKind, SyncStatus, SyncSummary};

use super::{ApiError, AppState};

/// Default re-sync interval when `sync/start` doesn't specify one.
const DEFAULT_INTERVAL_SECS: u64 = 900;

const MAX_RUNS_LIMIT: i64 = 100;

#[derive(serde::Deserialize, Default)]
pub struct RunSyncDto {
    /// Sync just this entity; omit to sync everything.
    pub entity: Option<String>,
}

#[derive(serde::Deserialize, Default)]
pub struct StartSyncDto {
    pub interval_secs: Option<u64>,
}

#[derive(serde::Deserialize)]
pub struct RunsQuery {
    pub limit: Option<i64>,
}

/// `POST /api/v1/sync/run` — run a sync right now and wait for its summary.
pub async fn run(
    State(state): State<AppState>,
    payload: Option<Json<RunSyncDto>>,
) -> Result<Json<SyncSummary>, ApiError> {
    let dto = payload.map(|Json(d)| d).unwrap_or_default();

    let entity = dto
        .entity
        .map(|s| s.parse::<EntityKind>())
        .transpose()
        .map_err(ApiError::BadRequest)?;

    let summary = state.sync.run_now(entity).await?;
    Ok(Json(summary))
}

/// `POST /api/v1/sync/start` — start the periodic re-sync loop.
pub async fn start(
    State(state): State<AppState>,
    payload: Option<Json<StartSyncDto>>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let dto = payload.map(|Json(d)| d).unwrap_or_default();
    let interval_secs = dto.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS);

    if interval_secs == 0 {
        return Err(ApiError::BadRequest("interval_secs must be positive".into()));
    }

    state.sync.start(Duration::from_secs(interval_secs))?;

    Ok((
        StatusCode::ACCEPTED,
        Json(json!({ "message": "periodic sync started", "interval_secs": interval_secs })),
    ))
}

/// `POST /api/v1/sync/stop` — stop the periodic re-sync loop.
pub async fn stop(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.sync.stop()?;
    Ok(Json(json!({ "message": "periodic sync stopped" })))
}

/// `GET /api/v1/sync/status` — controller snapshot.
pub async fn status(State(state): State<AppState>) -> Json<SyncStatus> {
    Json(state.sync.status())
}

/// `GET /api/v1/sync/runs` — recent sync run bookkeeping rows.
pub async fn runs(
    State(state): State<AppState>,
    Query(params): Query<RunsQuery>,
) -> Result<Json<Vec<SyncRunRow>>, ApiError> {
    let limit = params.limit.unwrap_or(20).clamp(1, MAX_RUNS_LIMIT);
    let rows = runs_repo::list_recent_runs(&state.pool, limit).await?;
    Ok(Json(rows))
}
