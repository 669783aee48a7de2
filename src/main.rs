//! FamVault daemon.
//!
//! Entry point that runs database migrations and drives the background
//! inbox sweep worker. The service crates are the programmable surface;
//! this binary only hosts the parts that must run continuously.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use famvault_core::config::AppConfig;
use famvault_core::error::AppError;
use famvault_service::{FamilyLocks, InboxProcessor};
use famvault_store::postgres::{
    PgFileStore, PgFolderStore, PgProcessingLogStore, PgRuleStore, PgTagStore,
};
use famvault_store::{DatabasePool, FileStore, FolderStore, ProcessingLogStore, RuleStore, TagStore};
use famvault_worker::{InboxSweeper, SweepScheduler, WorkerRunner};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Daemon error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration for the current environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("FAMVAULT_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main daemon run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting FamVault v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db_pool = DatabasePool::connect(&config.database).await?;
    famvault_store::migration::run_migrations(db_pool.pool()).await?;

    // ── Step 2: Shutdown plumbing ────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cancel = CancellationToken::new();

    // ── Step 3: Start background worker ──────────────────────────
    let (worker_handle, mut scheduler) = if config.worker.enabled {
        tracing::info!("Starting inbox worker...");

        let folders: Arc<dyn FolderStore> = Arc::new(PgFolderStore::new(db_pool.pool().clone()));
        let files: Arc<dyn FileStore> = Arc::new(PgFileStore::new(db_pool.pool().clone()));
        let rules: Arc<dyn RuleStore> = Arc::new(PgRuleStore::new(db_pool.pool().clone()));
        let tags: Arc<dyn TagStore> = Arc::new(PgTagStore::new(db_pool.pool().clone()));
        let log: Arc<dyn ProcessingLogStore> =
            Arc::new(PgProcessingLogStore::new(db_pool.pool().clone()));

        let locks = Arc::new(FamilyLocks::new());
        let processor = Arc::new(InboxProcessor::new(
            Arc::clone(&folders),
            Arc::clone(&files),
            rules,
            tags,
            log,
            locks,
        ));
        let sweeper = Arc::new(InboxSweeper::new(files, processor));

        let scheduler = SweepScheduler::new(
            Arc::clone(&sweeper),
            config.worker.sweep_schedule.clone(),
            cancel.clone(),
        )
        .await?;
        scheduler.register_sweep_task().await?;
        scheduler.start().await?;

        let runner = WorkerRunner::new(sweeper, config.worker.clone(), cancel.clone());
        let worker_shutdown = shutdown_rx.clone();
        let handle = tokio::spawn(async move {
            runner.run(worker_shutdown).await;
        });

        tracing::info!("Inbox worker started");
        (Some(handle), Some(scheduler))
    } else {
        tracing::info!("Inbox worker disabled");
        (None, None)
    };

    // ── Step 4: Wait for shutdown signal ─────────────────────────
    tracing::info!("FamVault daemon running");

    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");

    cancel.cancel();
    let _ = shutdown_tx.send(true);

    if let Some(scheduler) = scheduler.as_mut() {
        if let Err(e) = scheduler.shutdown().await {
            tracing::error!("Scheduler shutdown error: {}", e);
        }
    }

    if let Some(handle) = worker_handle {
        let _ = tokio::time::timeout(std::time::Duration::from_secs(30), handle).await;
    }

    db_pool.close().await;

    tracing::info!("FamVault daemon shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
