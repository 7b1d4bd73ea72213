//! `atelier` CLI entry-point.
//!
//! Available sub-commands:
//! - `serve`   — start the API server (optionally with periodic re-sync).
//! - `sync`    — run a one-shot sync and print the summary.
//! - `migrate` — run pending database migrations.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use api::AppState;
use connectors::{AirtableSource, RecordSource};
use engine::{EntityKind, SyncConfig, SyncEngine, SyncService};

#[derive(Parser)]
#[command(
    name = "atelier",
    about = "Content and sync service for the atelier gallery site",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the REST API server.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        /// Start the periodic re-sync loop with this interval.
        #[arg(long)]
        sync_interval_secs: Option<u64>,
    },
    /// Run a one-shot sync and print the summary as JSON.
    Sync {
        /// Sync just this entity (e.g. `artists`); omit to sync everything.
        #[arg(long)]
        entity: Option<String>,
    },
    /// Run pending database migrations.
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { bind, sync_interval_secs } => {
            info!("Starting API server on {bind}");
            let pool = db::pool::create_pool(&database_url()?, 10).await?;
            let sync = Arc::new(SyncService::new(build_engine(pool.clone())?));

            if let Some(secs) = sync_interval_secs {
                sync.start(Duration::from_secs(secs))?;
            }

            api::serve(&bind, AppState { pool, sync }).await?;
        }

        Command::Sync { entity } => {
            let pool = db::pool::create_pool(&database_url()?, 5).await?;
            let engine = build_engine(pool)?;

            let summary = match entity {
                Some(name) => {
                    let kind: EntityKind = name
                        .parse()
                        .map_err(|e: String| anyhow::anyhow!(e))?;
                    engine.sync_one(kind).await
                }
                None => engine.sync_all().await,
            };

            println!("{}", serde_json::to_string_pretty(&summary)?);
        }

        Command::Migrate => {
            let pool = db::pool::create_pool(&database_url()?, 2).await?;
            db::pool::run_migrations(&pool).await?;
            info!("Migrations applied successfully");
        }
    }

    Ok(())
}

fn database_url() -> anyhow::Result<String> {
    std::env::var("DATABASE_URL").context("DATABASE_URL is not set")
}

/// Build the sync engine from `ATELIER_SOURCE_*` environment variables.
fn build_engine(pool: db::DbPool) -> anyhow::Result<Arc<SyncEngine>> {
    let base_id =
        std::env::var("ATELIER_SOURCE_BASE").context("ATELIER_SOURCE_BASE is not set")?;
    let token =
        std::env::var("ATELIER_SOURCE_TOKEN").context("ATELIER_SOURCE_TOKEN is not set")?;

    let mut config = SyncConfig::default();
    if let Ok(page_size) = std::env::var("ATELIER_SOURCE_PAGE_SIZE") {
        config.page_size = page_size
            .parse()
            .context("ATELIER_SOURCE_PAGE_SIZE must be an integer")?;
    }

    let mut source = AirtableSource::new(base_id, token)?.with_page_size(config.page_size);
    if let Ok(api_base) = std::env::var("ATELIER_SOURCE_API_BASE") {
        source = source.with_api_base(api_base);
    }

    let source: Arc<dyn RecordSource> = Arc::new(source);
    Ok(Arc::new(SyncEngine::new(pool, source, config)))
}
