//! `api` crate — HTTP REST API layer.
//!
//! Exposes:
//!   GET/POST        /api/v1/{artists,artworks,exhibitions,events,notices}
//!   GET/PUT/DELETE  /api/v1/{artists,…}/{id}
//!   POST            /api/v1/sync/run
//!   POST            /api/v1/sync/start
//!   POST            /api/v1/sync/stop
//!   GET             /api/v1/sync/status
//!   GET             /api/v1/sync/runs

pub mod handlers;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use handlers::AppState;

use handlers::{artists, artworks, events, exhibitions, notices, sync};

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/artists", get(artists::list).post(artists::create))
        .route(
            "/api/v1/artists/:id",
            get(artists::get).put(artists::update).delete(artists::delete),
        )
        .route("/api/v1/artworks", get(artworks::list).post(artworks::create))
        .route(
            "/api/v1/artworks/:id",
            get(artworks::get).put(artworks::update).delete(artworks::delete),
        )
        .route(
            "/api/v1/exhibitions",
            get(exhibitions::list).post(exhibitions::create),
        )
        .route(
            "/api/v1/exhibitions/:id",
            get(exhibitions::get)
                .put(exhibitions::update)
                .delete(exhibitions::delete),
        )
        .route("/api/v1/events", get(events::list).post(events::create))
        .route(
            "/api/v1/events/:id",
            get(events::get).put(events::update).delete(events::delete),
        )
        .route("/api/v1/notices", get(notices::list).post(notices::create))
        .route(
            "/api/v1/notices/:id",
            get(notices::get).put(notices::update).delete(notices::delete),
        )
        .route("/api/v1/sync/run", post(sync::run))
        .route("/api/v1/sync/start", post(sync::start))
        .route("/api/v1/sync/stop", post(sync::stop))
        .route("/api/v1/sync/status", get(sync::status))
        .route("/api/v1/sync/runs", get(sync::runs))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind and serve the API until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("API listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await
}

#[cfg(test)]
mod router_tests {
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    use connectors::mock::MockSource;
    use engine::{SyncConfig, SyncEngine, SyncService};

    use super::*;

    /// State backed by a lazy pool (never connects) and a mock source —
    /// enough for handlers that don't touch the database.
    fn test_state() -> AppState {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://postgres@localhost/atelier_test")
            .expect("lazy pool");
        let engine = Arc::new(SyncEngine::new(
            pool.clone(),
            Arc::new(MockSource::new()),
            SyncConfig::default(),
        ));
        AppState {
            pool,
            sync: Arc::new(SyncService::new(engine)),
        }
    }

    #[tokio::test]
    async fn sync_status_returns_idle_snapshot() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/sync/status")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["scheduler_running"], false);
        assert_eq!(v["sync_in_flight"], false);
        assert!(v["last_summary"].is_null());
    }

    #[tokio::test]
    async fn stopping_an_idle_scheduler_is_a_conflict() {
        let app = router(test_state());

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/sync/stop")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let v: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(v["error"]["status"], 409);
        assert!(v["error"]["message"].is_string());
    }

    #[tokio::test]
    async fn start_then_second_start_conflicts_then_stop_succeeds() {
        let state = test_state();

        state.sync.start(Duration::from_secs(3600)).expect("first start");
        assert!(matches!(
            state.sync.start(Duration::from_secs(3600)),
            Err(engine::EngineError::AlreadyRunning)
        ));
        state.sync.stop().expect("stop");
    }
}
