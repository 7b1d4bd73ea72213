//! The `RecordSource` trait — the contract every source must fulfil.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::SourceError;

/// One raw record as served by the source, before any field mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    /// Source-assigned record ID (the sync idempotency key).
    pub id: String,
    /// Unparsed field payload; a JSON object in the happy case.
    #[serde(default)]
    pub fields: serde_json::Value,
}

/// One page of records plus the cursor for the next page.
#[derive(Debug, Clone, Default)]
pub struct RecordPage {
    pub records: Vec<RawRecord>,
    /// Opaque continuation cursor; `None` means this was the last page.
    pub offset: Option<String>,
}

/// The core source trait.
///
/// Implementations fetch one page per call; pagination state lives entirely
/// in the opaque `offset` cursor so the caller owns the loop.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch one page of records from `table`, resuming at `offset` if given.
    async fn fetch_page(
        &self,
        table: &str,
        offset: Option<&str>,
    ) -> Result<RecordPage, SourceError>;
}
