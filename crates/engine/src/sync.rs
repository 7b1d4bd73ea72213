//! The sync engine — batched, idempotent, partially-recoverable transfer
//! from the external record store into Postgres.
//!
//! `SyncEngine` is the central orchestrator:
//! 1. Opens a `sync_runs` bookkeeping row.
//! 2. Fetches every source record page by page (with retry on transient
//!    failures).
//! 3. Maps each record to a typed row; unmappable records are counted and
//!    skipped.
//! 4. Upserts each row keyed on `external_id`; per-record write failures are
//!    counted and skipped.
//! 5. Finalises the run row with `{fetched, upserted, failed}` counts.

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info, instrument, warn};

use connectors::RecordSource;
use db::models::SyncRunStatus;
use db::DbPool;

use crate::mapper::{plan_upserts, MappedRecord};
use crate::models::{EntityKind, SyncOutcome, SyncReport, SyncSummary};
use crate::{fetch, EngineError};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Tuning knobs for the sync engine.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Maximum number of times a retryable page fetch will be retried.
    pub max_retries: u32,
    /// Base delay for exponential back-off between retries.
    pub retry_base_delay: Duration,
    /// Records requested per source page; the source builder consumes this.
    pub page_size: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_base_delay: Duration::from_millis(200),
            page_size: 100,
        }
    }
}

// ---------------------------------------------------------------------------
// SyncEngine
// ---------------------------------------------------------------------------

/// Stateless orchestrator that transfers records from one source into the
/// destination database.
pub struct SyncEngine {
    pool: DbPool,
    source: Arc<dyn RecordSource>,
    config: SyncConfig,
}

impl SyncEngine {
    /// Create a new engine.
    pub fn new(pool: DbPool, source: Arc<dyn RecordSource>, config: SyncConfig) -> Self {
        Self { pool, source, config }
    }

    /// Sync a single entity and return its counts.
    ///
    /// A `sync_runs` row is opened before any source call and finalised
    /// exactly once, on both the success and the failure path.
    ///
    /// # Errors
    /// Returns `EngineError` for fatal source errors, retry exhaustion, or
    /// bookkeeping database failures.  Per-record mapping and upsert
    /// failures are *not* errors; they land in the `failed` count.
    #[instrument(skip(self), fields(entity = %kind))]
    pub async fn sync_entity(&self, kind: EntityKind) -> Result<SyncReport, EngineError> {
        let run = db::repository::sync_runs::create_run(&self.pool, kind.dest_table()).await?;

        let records =
            match fetch::fetch_all(self.source.as_ref(), kind.source_table(), &self.config).await {
                Ok(records) => records,
                Err(e) => {
                    error!("fetch aborted for '{}': {e}", kind.source_table());
                    db::repository::sync_runs::finish_run(
                        &self.pool,
                        run.id,
                        SyncRunStatus::Failed,
                        0,
                        0,
                        0,
                        Some(&e.to_string()),
                    )
                    .await?;
                    return Err(e);
                }
            };

        let fetched = records.len() as u32;
        let (mapped, mut failed) = plan_upserts(kind, &records);

        let mut upserted = 0u32;
        for row in mapped {
            match self.upsert(row).await {
                Ok(()) => upserted += 1,
                Err(e) => {
                    warn!(entity = %kind, "per-record upsert failed: {e}");
                    failed += 1;
                }
            }
        }

        db::repository::sync_runs::finish_run(
            &self.pool,
            run.id,
            SyncRunStatus::Succeeded,
            fetched as i32,
            upserted as i32,
            failed as i32,
            None,
        )
        .await?;

        info!(
            "synced '{}': fetched={} upserted={} failed={}",
            kind, fetched, upserted, failed
        );

        Ok(SyncReport { entity: kind, fetched, upserted, failed })
    }

    /// Sync every entity in order.
    ///
    /// An entity-level failure is recorded in its outcome and does not stop
    /// later entities.
    #[instrument(skip(self))]
    pub async fn sync_all(&self) -> SyncSummary {
        let mut outcomes = Vec::with_capacity(EntityKind::ALL.len());

        for kind in EntityKind::ALL {
            let outcome = match self.sync_entity(kind).await {
                Ok(report) => SyncOutcome { entity: kind, report: Some(report), error: None },
                Err(e) => SyncOutcome { entity: kind, report: None, error: Some(e.to_string()) },
            };
            outcomes.push(outcome);
        }

        SyncSummary::new(outcomes)
    }

    /// Sync one entity but package the result as a one-outcome summary, so
    /// callers that don't care about granularity handle a single shape.
    pub async fn sync_one(&self, kind: EntityKind) -> SyncSummary {
        let outcome = match self.sync_entity(kind).await {
            Ok(report) => SyncOutcome { entity: kind, report: Some(report), error: None },
            Err(e) => SyncOutcome { entity: kind, report: None, error: Some(e.to_string()) },
        };
        SyncSummary::new(vec![outcome])
    }

    // -----------------------------------------------------------------------
    // Internal: dispatch one mapped row to its table's upsert.
    // -----------------------------------------------------------------------

    async fn upsert(&self, row: MappedRecord) -> Result<(), EngineError> {
        use db::repository as repo;

        match row {
            MappedRecord::Artist(a) => {
                repo::artists::upsert_artist(&self.pool, &a).await?;
            }
            MappedRecord::Artwork(a) => {
                repo::artworks::upsert_artwork(&self.pool, &a).await?;
            }
            MappedRecord::Exhibition(e) => {
                repo::exhibitions::upsert_exhibition(&self.pool, &e).await?;
            }
            MappedRecord::Event(e) => {
                repo::events::upsert_event(&self.pool, &e).await?;
            }
            MappedRecord::Notice(n) => {
                repo::notices::upsert_notice(&self.pool, &n).await?;
            }
        }

        Ok(())
    }
}
