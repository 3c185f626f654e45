//! Cellar Keeper — Entry Point
//!
//! Wiring sequence:
//! 1. Parse the command line
//! 2. Load the config file (or built-in defaults) + validate
//! 3. Init tracing (plain or JSON, to stderr)
//! 4. Open the configured store adapter (file or memory)
//! 5. Create the CollectionManager and load (seeding on first run)
//! 6. Run the requested command against the loaded collection

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cellar_keeper::adapters::persistence::{FileStore, MemoryStore};
use cellar_keeper::config::{self, AppConfig, StorageBackend};
use cellar_keeper::domain::samples::sample_wines;
use cellar_keeper::ports::KeyValueStore;
use cellar_keeper::usecases::CollectionManager;

mod cli;
mod commands;

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1. Parse command line ───────────────────────────────
    let cli = cli::Cli::parse();

    // ── 2. Load configuration ───────────────────────────────
    let config = match &cli.config {
        Some(path) => config::loader::load_config(path).context("Failed to load configuration")?,
        None => AppConfig::default(),
    };

    // ── 3. Initialize structured logging ────────────────────
    init_tracing(&config);

    info!(
        name = %config.app.name,
        version = env!("CARGO_PKG_VERSION"),
        backend = ?config.storage.backend,
        "Starting Cellar Keeper"
    );

    // ── 4. Open the store and run ───────────────────────────
    match config.storage.backend {
        StorageBackend::File => {
            let store = FileStore::new(&config.storage.data_dir)
                .await
                .context("Failed to open data directory")?;
            run(Arc::new(store), &config, cli.command).await
        }
        StorageBackend::Memory => {
            warn!("Memory backend selected — changes are lost on exit");
            run(Arc::new(MemoryStore::new()), &config, cli.command).await
        }
    }
}

/// Build the manager over `store`, load the collection, run one command.
async fn run<S: KeyValueStore>(store: Arc<S>, config: &AppConfig, command: cli::Command) -> Result<()> {
    if !store.is_healthy().await {
        warn!("Store health check failed — writes may not persist");
    }

    // ── 5. Create the collection manager and load ───────────
    let seed = config.seed.enabled.then(sample_wines);
    let manager = CollectionManager::new(store, config.storage.keys(), seed);
    let wines = manager.load().await;
    info!(count = wines.len(), "Collection ready");

    // ── 6. Execute the command ──────────────────────────────
    commands::run_command(&manager, command).await
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.app.log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if config.app.json_logs {
        builder.json().init();
    } else {
        builder.init();
    }
}
