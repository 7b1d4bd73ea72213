//! Tests for the paged fetch layer.
//!
//! These use `MockSource` so no network or database is required.  Tests
//! that exercise real upserts against a live Postgres belong in an
//! integration harness, not here.

use std::time::Duration;

use connectors::mock::{page, record, MockSource};
use connectors::SourceError;
use serde_json::json;

use crate::fetch::fetch_all;
use crate::sync::SyncConfig;
use crate::EngineError;

fn fast_config() -> SyncConfig {
    SyncConfig {
        max_retries: 2,
        retry_base_delay: Duration::from_millis(1),
        ..SyncConfig::default()
    }
}

#[tokio::test]
async fn fetch_follows_pagination_to_the_end() {
    let source = MockSource::new().script(
        "Artists",
        vec![
            Ok(page(
                vec![
                    record("rec1", json!({"Name": "Ada"})),
                    record("rec2", json!({"Name": "Bea"})),
                ],
                Some("p2"),
            )),
            Ok(page(vec![record("rec3", json!({"Name": "Cy"}))], Some("p3"))),
            Ok(page(vec![record("rec4", json!({"Name": "Di"}))], None)),
        ],
    );

    let records = fetch_all(&source, "Artists", &fast_config())
        .await
        .expect("fetch should succeed");

    assert_eq!(records.len(), 4);
    assert_eq!(records[0].id, "rec1");
    assert_eq!(records[3].id, "rec4");
    assert_eq!(source.call_count(), 3);
}

#[tokio::test]
async fn empty_table_yields_no_records() {
    let source = MockSource::new();
    let records = fetch_all(&source, "Artists", &fast_config())
        .await
        .expect("empty table is not an error");

    assert!(records.is_empty());
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn transient_failure_is_retried_then_succeeds() {
    let source = MockSource::new().script(
        "Artists",
        vec![
            Err(SourceError::Retryable("rate limited".into())),
            Ok(page(vec![record("rec1", json!({"Name": "Ada"}))], None)),
        ],
    );

    let records = fetch_all(&source, "Artists", &fast_config())
        .await
        .expect("should recover after retry");

    assert_eq!(records.len(), 1);
    assert_eq!(source.call_count(), 2);
}

#[tokio::test]
async fn retry_budget_exhaustion_aborts_the_fetch() {
    let source = MockSource::new().script(
        "Artists",
        vec![
            Err(SourceError::Retryable("down".into())),
            Err(SourceError::Retryable("down".into())),
            Err(SourceError::Retryable("down".into())),
            Err(SourceError::Retryable("down".into())),
        ],
    );

    let result = fetch_all(&source, "Artists", &fast_config()).await;

    assert!(matches!(
        result,
        Err(EngineError::RetryExhausted { ref table, .. }) if table == "Artists"
    ));
    // One initial attempt plus max_retries.
    assert_eq!(source.call_count(), 3);
}

#[tokio::test]
async fn fatal_failure_aborts_without_retry() {
    let source = MockSource::new().script(
        "Artists",
        vec![Err(SourceError::Fatal("bad token".into()))],
    );

    let result = fetch_all(&source, "Artists", &fast_config()).await;

    assert!(matches!(result, Err(EngineError::Source { .. })));
    assert_eq!(source.call_count(), 1);
}

#[tokio::test]
async fn fatal_error_mid_pagination_aborts_the_whole_fetch() {
    // The caller never sees a partial record set it could mistake for the
    // full table.
    let source = MockSource::new().script(
        "Artists",
        vec![
            Ok(page(vec![record("rec1", json!({"Name": "Ada"}))], Some("p2"))),
            Err(SourceError::Fatal("table vanished".into())),
        ],
    );

    let result = fetch_all(&source, "Artists", &fast_config()).await;
    assert!(result.is_err());
    assert_eq!(source.call_count(), 2);
}
