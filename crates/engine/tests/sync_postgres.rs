//! Integration tests that run `SyncEngine` against a live Postgres.
//!
//! Ignored by default; point `DATABASE_URL` at a scratch database and run:
//!
//! ```text
//! DATABASE_URL=postgres://... cargo test -p engine -- --ignored
//! ```
//!
//! Each test syncs a different entity so parallel tests never touch the same
//! table or read each other's `sync_runs` rows.

use std::sync::Arc;

use serde_json::json;

use connectors::mock::{page, record, MockSource};
use connectors::SourceError;
use db::models::{SyncRunRow, SyncRunStatus};
use engine::{EntityKind, SyncConfig, SyncEngine};

async fn test_pool() -> db::DbPool {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must point at a scratch database");
    let pool = db::pool::create_pool(&url, 5).await.expect("connect");
    db::pool::run_migrations(&pool).await.expect("migrate");
    pool
}

fn engine_with(pool: db::DbPool, source: MockSource) -> SyncEngine {
    SyncEngine::new(pool, Arc::new(source), SyncConfig::default())
}

async fn latest_run(pool: &db::DbPool, entity: &str) -> SyncRunRow {
    db::repository::sync_runs::list_recent_runs(pool, 50)
        .await
        .expect("list runs")
        .into_iter()
        .find(|r| r.entity == entity)
        .expect("a run row for the entity")
}

#[tokio::test]
#[ignore]
async fn sync_counts_add_up_and_the_run_is_finalised() {
    let pool = test_pool().await;
    let source = MockSource::new().script(
        "Artists",
        vec![Ok(page(
            vec![
                record("it-count-1", json!({ "Name": "Count Artist One" })),
                record("it-count-2", json!({ "Name": "Count Artist Two" })),
                record("it-count-bad", json!({ "Bio": "missing name" })),
            ],
            None,
        ))],
    );

    let report = engine_with(pool.clone(), source)
        .sync_entity(EntityKind::Artist)
        .await
        .expect("sync succeeds");

    assert_eq!(report.fetched, 3);
    assert_eq!(report.upserted, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.fetched, report.upserted + report.failed);

    let run = latest_run(&pool, "artists").await;
    assert_eq!(run.status, SyncRunStatus::Succeeded.to_string());
    assert_eq!((run.fetched, run.upserted, run.failed), (3, 2, 1));
    assert!(run.finished_at.is_some());
    assert!(run.error.is_none());
}

#[tokio::test]
#[ignore]
async fn fatal_source_error_finalises_the_run_as_failed() {
    let pool = test_pool().await;
    let source = MockSource::new().script(
        "Exhibitions",
        vec![Err(SourceError::Fatal("invalid token".into()))],
    );

    let result = engine_with(pool.clone(), source)
        .sync_entity(EntityKind::Exhibition)
        .await;
    assert!(result.is_err());

    let run = latest_run(&pool, "exhibitions").await;
    assert_eq!(run.status, SyncRunStatus::Failed.to_string());
    assert!(run.finished_at.is_some(), "failed runs are finalised too");
    assert!(run.error.is_some());
}

#[tokio::test]
#[ignore]
async fn resync_with_unchanged_source_does_not_duplicate_rows() {
    let pool = test_pool().await;
    let fields = json!({ "Title": "Opening Hours Notice", "Pinned": false });
    let source = MockSource::new().script(
        "Notices",
        vec![
            Ok(page(vec![record("it-idem-1", fields.clone())], None)),
            Ok(page(vec![record("it-idem-1", fields)], None)),
        ],
    );

    let engine = engine_with(pool.clone(), source);
    engine
        .sync_entity(EntityKind::Notice)
        .await
        .expect("first sync");
    engine
        .sync_entity(EntityKind::Notice)
        .await
        .expect("second sync");

    let rows = db::repository::notices::list_notices(&pool, Some("Opening Hours Notice"), None)
        .await
        .expect("list notices");
    assert_eq!(rows.len(), 1, "re-sync must upsert, not insert");
}
