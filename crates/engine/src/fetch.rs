//! Paged fetch with retry — walks a source table's pagination cursor.

use connectors::{RawRecord, RecordSource, SourceError};
use tracing::{debug, warn};

use crate::sync::SyncConfig;
use crate::EngineError;

/// Fetch every record from `table`, following the offset cursor to the end.
///
/// Each page fetch retries `Retryable` source errors up to
/// `config.max_retries` with exponential back-off.  A `Fatal` error or retry
/// exhaustion aborts the whole fetch.
pub async fn fetch_all(
    source: &dyn RecordSource,
    table: &str,
    config: &SyncConfig,
) -> Result<Vec<RawRecord>, EngineError> {
    let mut records = Vec::new();
    let mut offset: Option<String> = None;

    loop {
        let page = fetch_page_with_retry(source, table, offset.as_deref(), config).await?;

        debug!(table, page_len = page.records.len(), "page fetched");
        records.extend(page.records);

        match page.offset {
            Some(next) => offset = Some(next),
            None => break,
        }
    }

    Ok(records)
}

async fn fetch_page_with_retry(
    source: &dyn RecordSource,
    table: &str,
    offset: Option<&str>,
    config: &SyncConfig,
) -> Result<connectors::RecordPage, EngineError> {
    let mut attempts = 0u32;

    loop {
        match source.fetch_page(table, offset).await {
            Ok(page) => return Ok(page),

            Err(err @ SourceError::Fatal(_)) => {
                return Err(EngineError::Source {
                    table: table.to_owned(),
                    source: err,
                });
            }

            Err(SourceError::Retryable(msg)) => {
                attempts += 1;
                if attempts > config.max_retries {
                    return Err(EngineError::RetryExhausted {
                        table: table.to_owned(),
                        message: msg,
                    });
                }

                let delay = config.retry_base_delay * 2u32.pow(attempts.saturating_sub(1));

                warn!(
                    "table '{}' retryable fetch error (attempt {}/{}), retrying in {:?}: {}",
                    table, attempts, config.max_retries, delay, msg
                );

                tokio::time::sleep(delay).await;
            }
        }
    }
}
