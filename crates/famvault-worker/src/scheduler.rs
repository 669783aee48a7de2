//! Cron scheduler for the periodic full inbox sweep.

use std::sync::Arc;

use tokio_cron_scheduler::{Job as CronJob, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing;

use famvault_core::error::AppError;

use crate::sweep::InboxSweeper;

/// Cron-based scheduler that runs a full sweep pass on a fixed schedule,
/// independent of the fallback poll loop. Overlap with poll-driven sweeps
/// is harmless: a family already being swept is skipped.
pub struct SweepScheduler {
    /// The underlying job scheduler.
    scheduler: JobScheduler,
    /// The sweeper invoked on each tick.
    sweeper: Arc<InboxSweeper>,
    /// Cron schedule (with seconds field).
    schedule: String,
    /// Cancellation token handed to in-flight sweeps on shutdown.
    cancel: CancellationToken,
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler")
            .field("schedule", &self.schedule)
            .finish()
    }
}

impl SweepScheduler {
    /// Create a new sweep scheduler.
    pub async fn new(
        sweeper: Arc<InboxSweeper>,
        schedule: String,
        cancel: CancellationToken,
    ) -> Result<Self, AppError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| AppError::internal(format!("Failed to create scheduler: {}", e)))?;

        Ok(Self {
            scheduler,
            sweeper,
            schedule,
            cancel,
        })
    }

    /// Register the periodic inbox sweep.
    pub async fn register_sweep_task(&self) -> Result<(), AppError> {
        let sweeper = Arc::clone(&self.sweeper);
        let cancel = self.cancel.clone();

        let job = CronJob::new_async(self.schedule.as_str(), move |_uuid, _lock| {
            let sweeper = Arc::clone(&sweeper);
            let cancel = cancel.clone();
            Box::pin(async move {
                tracing::debug!("Running scheduled inbox sweep");
                match sweeper.sweep_pending(&cancel).await {
                    Ok(stats) => {
                        if stats.families_swept > 0 || stats.families_failed > 0 {
                            tracing::info!(
                                "Scheduled sweep: {} families swept, {} skipped, {} failed, {} files processed",
                                stats.families_swept,
                                stats.families_skipped,
                                stats.families_failed,
                                stats.files_processed
                            );
                        }
                    }
                    Err(e) => {
                        tracing::error!("Scheduled inbox sweep failed: {}", e);
                    }
                }
            })
        })
        .map_err(|e| AppError::internal(format!("Failed to create sweep schedule: {}", e)))?;

        self.scheduler
            .add(job)
            .await
            .map_err(|e| AppError::internal(format!("Failed to add sweep schedule: {}", e)))?;

        tracing::info!("Registered: inbox_sweep ({})", self.schedule);
        Ok(())
    }

    /// Start the scheduler.
    pub async fn start(&self) -> Result<(), AppError> {
        self.scheduler
            .start()
            .await
            .map_err(|e| AppError::internal(format!("Failed to start scheduler: {}", e)))?;

        tracing::info!("Sweep scheduler started");
        Ok(())
    }

    /// Shutdown the scheduler.
    pub async fn shutdown(&mut self) -> Result<(), AppError> {
        self.scheduler
            .shutdown()
            .await
            .map_err(|e| AppError::internal(format!("Failed to shutdown scheduler: {}", e)))?;

        tracing::info!("Sweep scheduler shut down");
        Ok(())
    }
}
