//! Periodic re-sync — a single timer loop with a watch-channel stop signal.
//!
//! There is no worker pool and no backpressure: one loop, one sync in
//! flight.  A tick that arrives while a sync is still executing is skipped,
//! so overlapping syncs are impossible by construction.

use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

use crate::models::{EntityKind, SyncSummary};
use crate::sync::SyncEngine;
use crate::EngineError;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Shared {
    /// Stop signal for the running loop; `Some` while the loop is alive.
    stop: Option<watch::Sender<bool>>,
    interval_secs: Option<u64>,
    in_flight: bool,
    last_summary: Option<SyncSummary>,
    last_completed_at: Option<DateTime<Utc>>,
}

/// Snapshot of the controller state, as reported by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub scheduler_running: bool,
    pub sync_in_flight: bool,
    pub interval_secs: Option<u64>,
    pub last_completed_at: Option<DateTime<Utc>>,
    pub last_summary: Option<SyncSummary>,
}

// ---------------------------------------------------------------------------
// SyncService
// ---------------------------------------------------------------------------

/// Owns the sync engine plus the periodic-loop lifecycle (start/stop/status)
/// and the single-flight guard for manual runs.
pub struct SyncService {
    engine: Arc<SyncEngine>,
    shared: Arc<Mutex<Shared>>,
}

impl SyncService {
    pub fn new(engine: Arc<SyncEngine>) -> Self {
        Self {
            engine,
            shared: Arc::new(Mutex::new(Shared::default())),
        }
    }

    /// Start the periodic loop.  The first sync fires immediately, then one
    /// per `interval`.
    ///
    /// Returns `EngineError::AlreadyRunning` if a loop is already active.
    pub fn start(&self, interval: Duration) -> Result<(), EngineError> {
        let mut shared = self.shared.lock().unwrap();
        if shared.stop.is_some() {
            return Err(EngineError::AlreadyRunning);
        }

        let (tx, rx) = watch::channel(false);
        shared.stop = Some(tx);
        shared.interval_secs = Some(interval.as_secs());
        drop(shared);

        let engine = Arc::clone(&self.engine);
        spawn_loop(Arc::clone(&self.shared), rx, interval, move || {
            let engine = Arc::clone(&engine);
            async move { engine.sync_all().await }
        });

        info!("periodic sync started (interval {:?})", interval);
        Ok(())
    }

    /// Stop the periodic loop.
    ///
    /// Returns `EngineError::NotRunning` if no loop is active.
    pub fn stop(&self) -> Result<(), EngineError> {
        let mut shared = self.shared.lock().unwrap();
        let Some(tx) = shared.stop.take() else {
            return Err(EngineError::NotRunning);
        };
        shared.interval_secs = None;

        // The loop may already be gone; that still counts as stopped.
        let _ = tx.send(true);

        info!("periodic sync stopped");
        Ok(())
    }

    /// Snapshot the controller state.
    pub fn status(&self) -> SyncStatus {
        let shared = self.shared.lock().unwrap();
        SyncStatus {
            scheduler_running: shared.stop.is_some(),
            sync_in_flight: shared.in_flight,
            interval_secs: shared.interval_secs,
            last_completed_at: shared.last_completed_at,
            last_summary: shared.last_summary.clone(),
        }
    }

    /// Run a sync right now — all entities, or just one.
    ///
    /// Returns `EngineError::SyncInFlight` if another sync (manual or
    /// scheduled) is currently executing, so two writers never interleave
    /// upserts for the same table.
    pub async fn run_now(&self, entity: Option<EntityKind>) -> Result<SyncSummary, EngineError> {
        let engine = Arc::clone(&self.engine);
        run_guarded(Arc::clone(&self.shared), async move {
            match entity {
                Some(kind) => engine.sync_one(kind).await,
                None => engine.sync_all().await,
            }
        })
        .await
    }
}

// ---------------------------------------------------------------------------
// Single-flight guard
// ---------------------------------------------------------------------------

/// Holds the `in_flight` flag and releases it on drop.
///
/// The caller's future can be dropped mid-sync (axum drops a handler future
/// when the client disconnects), so the flag must never depend on the code
/// after an `.await` running.
struct InFlightGuard {
    shared: Arc<Mutex<Shared>>,
}

impl InFlightGuard {
    fn acquire(shared: Arc<Mutex<Shared>>) -> Result<Self, EngineError> {
        let mut s = shared.lock().unwrap();
        if s.in_flight {
            return Err(EngineError::SyncInFlight);
        }
        s.in_flight = true;
        drop(s);
        Ok(Self { shared })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.shared.lock().unwrap().in_flight = false;
    }
}

/// Run one sync under the single-flight guard and record its summary.
async fn run_guarded<Fut>(
    shared: Arc<Mutex<Shared>>,
    sync_fut: Fut,
) -> Result<SyncSummary, EngineError>
where
    Fut: Future<Output = SyncSummary>,
{
    let _guard = InFlightGuard::acquire(Arc::clone(&shared))?;

    let summary = sync_fut.await;

    let mut s = shared.lock().unwrap();
    s.last_completed_at = Some(summary.completed_at);
    s.last_summary = Some(summary.clone());
    drop(s);

    Ok(summary)
}

// ---------------------------------------------------------------------------
// The loop itself — generic over the sync closure so the tick/stop machinery
// is testable without a database.
// ---------------------------------------------------------------------------

fn spawn_loop<F, Fut>(
    shared: Arc<Mutex<Shared>>,
    mut stop_rx: watch::Receiver<bool>,
    interval: Duration,
    sync_fn: F,
) -> JoinHandle<()>
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = SyncSummary> + Send,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = stop_rx.changed() => {
                    // A closed channel means the service was dropped; treat
                    // it the same as an explicit stop.
                    if changed.is_err() || *stop_rx.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    // A manual run may hold the flag; skip this tick.
                    let Ok(_guard) = InFlightGuard::acquire(Arc::clone(&shared)) else {
                        continue;
                    };

                    let summary = sync_fn().await;

                    let mut s = shared.lock().unwrap();
                    s.last_completed_at = Some(summary.completed_at);
                    s.last_summary = Some(summary);
                }
            }
        }
    })
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_sync(count: Arc<AtomicUsize>) -> impl Fn() -> std::pin::Pin<Box<dyn Future<Output = SyncSummary> + Send>> {
        move || {
            let count = Arc::clone(&count);
            Box::pin(async move {
                count.fetch_add(1, Ordering::SeqCst);
                SyncSummary::new(vec![])
            })
        }
    }

    #[tokio::test]
    async fn loop_ticks_until_stopped() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let (tx, rx) = watch::channel(false);
        let count = Arc::new(AtomicUsize::new(0));

        let handle = spawn_loop(
            Arc::clone(&shared),
            rx,
            Duration::from_millis(10),
            counting_sync(Arc::clone(&count)),
        );

        tokio::time::sleep(Duration::from_millis(55)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let ticks = count.load(Ordering::SeqCst);
        assert!(ticks >= 2, "expected at least 2 ticks, got {ticks}");

        // No further ticks after stop.
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(count.load(Ordering::SeqCst), ticks);
    }

    #[tokio::test]
    async fn loop_records_last_summary() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let (tx, rx) = watch::channel(false);
        let count = Arc::new(AtomicUsize::new(0));

        let handle = spawn_loop(
            Arc::clone(&shared),
            rx,
            Duration::from_millis(10),
            counting_sync(Arc::clone(&count)),
        );

        tokio::time::sleep(Duration::from_millis(30)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        let s = shared.lock().unwrap();
        assert!(s.last_summary.is_some());
        assert!(s.last_completed_at.is_some());
        assert!(!s.in_flight);
    }

    #[tokio::test]
    async fn ticks_are_skipped_while_a_sync_is_in_flight() {
        let shared = Arc::new(Mutex::new(Shared {
            in_flight: true,
            ..Shared::default()
        }));
        let (tx, rx) = watch::channel(false);
        let count = Arc::new(AtomicUsize::new(0));

        let handle = spawn_loop(
            Arc::clone(&shared),
            rx,
            Duration::from_millis(10),
            counting_sync(Arc::clone(&count)),
        );

        tokio::time::sleep(Duration::from_millis(40)).await;
        tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(count.load(Ordering::SeqCst), 0, "manual run should hold the loop off");
    }

    #[tokio::test]
    async fn cancelled_run_releases_the_in_flight_flag() {
        let shared = Arc::new(Mutex::new(Shared::default()));

        // A sync that never finishes, cancelled from the outside — the same
        // shape as a client dropping the request mid-run.
        let run = run_guarded(Arc::clone(&shared), std::future::pending::<SyncSummary>());
        let cancelled = tokio::time::timeout(Duration::from_millis(20), run).await;
        assert!(cancelled.is_err(), "the run should have been cancelled");

        assert!(
            !shared.lock().unwrap().in_flight,
            "cancellation must release the in-flight flag"
        );

        // The next run can acquire the flag again.
        let summary = run_guarded(Arc::clone(&shared), async { SyncSummary::new(vec![]) })
            .await
            .unwrap();
        assert!(summary.outcomes.is_empty());
        assert!(!shared.lock().unwrap().in_flight);
    }

    #[tokio::test]
    async fn concurrent_runs_conflict() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let _held = InFlightGuard::acquire(Arc::clone(&shared)).unwrap();

        let result = run_guarded(Arc::clone(&shared), async { SyncSummary::new(vec![]) }).await;
        assert!(matches!(result, Err(EngineError::SyncInFlight)));
    }

    #[tokio::test]
    async fn dropped_stop_sender_ends_the_loop() {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let (tx, rx) = watch::channel(false);
        let count = Arc::new(AtomicUsize::new(0));

        let handle = spawn_loop(
            Arc::clone(&shared),
            rx,
            Duration::from_millis(10),
            counting_sync(Arc::clone(&count)),
        );

        drop(tx);
        handle.await.unwrap();
    }
}
