//! Airtable-style record source.
//!
//! Speaks the Airtable REST convention: one GET per page with a bearer
//! token, records under a `records` array, and an opaque `offset` cursor
//! that is present while more pages remain.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{RawRecord, RecordPage, RecordSource, SourceError};

const DEFAULT_API_BASE: &str = "https://api.airtable.com/v0";
const DEFAULT_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    records: Vec<ApiRecord>,
    offset: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiRecord {
    id: String,
    #[serde(default)]
    fields: serde_json::Value,
}

/// HTTP client for one Airtable base.
#[derive(Clone)]
pub struct AirtableSource {
    client: Client,
    api_base: String,
    base_id: String,
    token: String,
    page_size: u32,
}

impl AirtableSource {
    /// Create a source for the given base, authenticated with `token`.
    pub fn new(base_id: impl Into<String>, token: impl Into<String>) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .map_err(|e| SourceError::Fatal(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
            base_id: base_id.into(),
            token: token.into(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Override the API base URL (used to point at a test server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Override the page size requested from the API.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Classify a non-success HTTP status into retry semantics.
    ///
    /// 429 (rate limit) and 5xx are transient; everything else (auth
    /// failures, unknown table) is permanent.
    fn classify_status(status: StatusCode, table: &str) -> SourceError {
        if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
            SourceError::Retryable(format!("source returned {status} for table '{table}'"))
        } else {
            SourceError::Fatal(format!("source returned {status} for table '{table}'"))
        }
    }
}

#[async_trait]
impl RecordSource for AirtableSource {
    #[instrument(level = "debug", skip(self, offset), fields(table = %table))]
    async fn fetch_page(
        &self,
        table: &str,
        offset: Option<&str>,
    ) -> Result<RecordPage, SourceError> {
        let url = format!("{}/{}/{}", self.api_base, self.base_id, table);

        let mut query: Vec<(&str, String)> = vec![("pageSize", self.page_size.to_string())];
        if let Some(cursor) = offset {
            query.push(("offset", cursor.to_string()));
        }

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .query(&query)
            .send()
            .await
            .map_err(|e| SourceError::Retryable(format!("transport error: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::classify_status(status, table));
        }

        let body: ListResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Fatal(format!("malformed response body: {e}")))?;

        debug!(
            records = body.records.len(),
            has_more = body.offset.is_some(),
            "fetched page"
        );

        Ok(RecordPage {
            records: body
                .records
                .into_iter()
                .map(|r| RawRecord { id: r.id, fields: r.fields })
                .collect(),
            offset: body.offset,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_is_retryable() {
        let err = AirtableSource::classify_status(StatusCode::TOO_MANY_REQUESTS, "artists");
        assert!(matches!(err, SourceError::Retryable(_)));
    }

    #[test]
    fn server_errors_are_retryable() {
        let err = AirtableSource::classify_status(StatusCode::BAD_GATEWAY, "artists");
        assert!(matches!(err, SourceError::Retryable(_)));
    }

    #[test]
    fn auth_failure_is_fatal() {
        let err = AirtableSource::classify_status(StatusCode::UNAUTHORIZED, "artists");
        assert!(matches!(err, SourceError::Fatal(_)));
    }

    #[test]
    fn unknown_table_is_fatal() {
        let err = AirtableSource::classify_status(StatusCode::NOT_FOUND, "ghosts");
        assert!(matches!(err, SourceError::Fatal(_)));
    }

    #[test]
    fn builder_overrides_are_applied() {
        let source = AirtableSource::new("appBase", "tok")
            .expect("client builds")
            .with_api_base("http://localhost:4010/v0")
            .with_page_size(25);

        assert_eq!(source.api_base, "http://localhost:4010/v0");
        assert_eq!(source.page_size, 25);
    }

    #[test]
    fn list_response_parses_without_offset() {
        let body = r#"{"records":[{"id":"rec1","fields":{"Name":"Ada"}}]}"#;
        let parsed: ListResponse = serde_json::from_str(body).expect("valid body");
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].id, "rec1");
        assert!(parsed.offset.is_none());
    }
}
