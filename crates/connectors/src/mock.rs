//! `MockSource` — a test double for `RecordSource`.
//!
//! Serves scripted pages (or scripted failures) per table and records every
//! call it receives, so engine tests run without a network or a real base.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::{RawRecord, RecordPage, RecordSource, SourceError};

/// Build a `RawRecord` from an ID and a JSON fields object.
pub fn record(id: impl Into<String>, fields: Value) -> RawRecord {
    RawRecord { id: id.into(), fields }
}

/// Build a `RecordPage` from records and an optional continuation cursor.
pub fn page(records: Vec<RawRecord>, offset: Option<&str>) -> RecordPage {
    RecordPage {
        records,
        offset: offset.map(str::to_owned),
    }
}

/// A mock source that pops one scripted response per `fetch_page` call.
///
/// Tables with no script (or an exhausted script) serve an empty final page,
/// which matches how an empty source table behaves.
pub struct MockSource {
    scripts: Mutex<HashMap<String, VecDeque<Result<RecordPage, SourceError>>>>,
    /// Every `(table, offset)` pair seen, in call order.
    calls: Mutex<Vec<(String, Option<String>)>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the sequence of responses served for `table`.
    pub fn script(
        self,
        table: impl Into<String>,
        responses: Vec<Result<RecordPage, SourceError>>,
    ) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(table.into(), responses.into());
        self
    }

    /// Number of `fetch_page` calls this source has seen.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of `fetch_page` calls made for one table.
    pub fn call_count_for(&self, table: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == table)
            .count()
    }
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecordSource for MockSource {
    async fn fetch_page(
        &self,
        table: &str,
        offset: Option<&str>,
    ) -> Result<RecordPage, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((table.to_owned(), offset.map(str::to_owned)));

        let next = self
            .scripts
            .lock()
            .unwrap()
            .get_mut(table)
            .and_then(VecDeque::pop_front);

        match next {
            Some(response) => response,
            None => Ok(RecordPage::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn scripted_pages_are_served_in_order() {
        let source = MockSource::new().script(
            "artists",
            vec![
                Ok(page(vec![record("rec1", json!({"Name": "Ada"}))], Some("cursor"))),
                Ok(page(vec![record("rec2", json!({"Name": "Bea"}))], None)),
            ],
        );

        let first = source.fetch_page("artists", None).await.unwrap();
        assert_eq!(first.records[0].id, "rec1");
        assert_eq!(first.offset.as_deref(), Some("cursor"));

        let second = source.fetch_page("artists", first.offset.as_deref()).await.unwrap();
        assert_eq!(second.records[0].id, "rec2");
        assert!(second.offset.is_none());

        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn unscripted_table_serves_empty_final_page() {
        let source = MockSource::new();
        let page = source.fetch_page("ghosts", None).await.unwrap();
        assert!(page.records.is_empty());
        assert!(page.offset.is_none());
    }

    #[tokio::test]
    async fn scripted_failure_is_returned() {
        let source = MockSource::new().script(
            "artists",
            vec![Err(SourceError::Retryable("rate limited".into()))],
        );

        let result = source.fetch_page("artists", None).await;
        assert!(matches!(result, Err(SourceError::Retryable(_))));
    }
}
