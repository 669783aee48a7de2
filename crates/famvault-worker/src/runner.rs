//! Worker runner: polls for pending inbox files and sweeps them.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing;

use famvault_core::config::WorkerConfig;

use crate::sweep::InboxSweeper;

/// Main worker loop that polls for families with pending inbox files and
/// sweeps each one on its own task.
#[derive(Debug)]
pub struct WorkerRunner {
    /// Sweeper doing the per-family work.
    sweeper: Arc<InboxSweeper>,
    /// Worker configuration.
    config: WorkerConfig,
    /// Cancellation token handed to in-flight sweeps on shutdown.
    cancel: CancellationToken,
}

impl WorkerRunner {
    /// Create a new worker runner.
    pub fn new(
        sweeper: Arc<InboxSweeper>,
        config: WorkerConfig,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            sweeper,
            config,
            cancel,
        }
    }

    /// Start the worker runner. Runs until the shutdown signal is received.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            "Inbox worker started with concurrency={}, poll_interval={}s",
            self.config.concurrency,
            self.config.poll_interval_seconds
        );

        let semaphore = Arc::new(tokio::sync::Semaphore::new(self.config.concurrency.max(1)));

        let poll_interval = Duration::from_secs(self.config.poll_interval_seconds);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        tracing::info!("Inbox worker received shutdown signal");
                        break;
                    }
                }
                _ = self.poll_and_sweep(&semaphore) => {
                    tokio::select! {
                        _ = shutdown.changed() => {
                            if *shutdown.borrow() {
                                tracing::info!("Inbox worker shutting down");
                                break;
                            }
                        }
                        _ = time::sleep(poll_interval) => {}
                    }
                }
            }
        }

        tracing::info!("Inbox worker waiting for in-flight sweeps to complete...");

        let max_permits = self.config.concurrency.max(1) as u32;
        let _ = tokio::time::timeout(Duration::from_secs(30), semaphore.acquire_many(max_permits))
            .await;

        tracing::info!("Inbox worker shut down complete");
    }

    /// One poll pass: spawn a sweep for every family with pending files,
    /// bounded by the concurrency semaphore. Families that do not get a
    /// slot wait for the next pass.
    async fn poll_and_sweep(&self, semaphore: &Arc<tokio::sync::Semaphore>) {
        let families = match self.sweeper.pending_families().await {
            Ok(families) => families,
            Err(e) => {
                tracing::error!("Failed to list families with pending inbox files: {}", e);
                return;
            }
        };

        if families.is_empty() {
            tracing::trace!("No pending inbox files");
            return;
        }

        for family_id in families {
            if self.cancel.is_cancelled() {
                break;
            }

            let permit = match semaphore.clone().try_acquire_owned() {
                Ok(p) => p,
                Err(_) => {
                    tracing::trace!("All sweep slots occupied, deferring to next poll");
                    return;
                }
            };

            let sweeper = Arc::clone(&self.sweeper);
            let cancel = self.cancel.clone();

            tokio::spawn(async move {
                let _permit = permit;

                match sweeper.sweep_family(family_id, &cancel).await {
                    Ok(Some(report)) => {
                        tracing::info!(
                            "Swept family {}: {} files processed, {} matched a rule",
                            family_id,
                            report.files_processed,
                            report.rules_matched
                        );
                    }
                    Ok(None) => {
                        tracing::debug!("Family {} busy, sweep skipped", family_id);
                    }
                    Err(e) => {
                        tracing::error!("Sweep of family {} failed: {}", family_id, e);
                    }
                }
            });
        }
    }
}
