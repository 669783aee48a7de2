//! Inbox sweeping across families.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing;

use famvault_core::error::AppError;
use famvault_core::types::FamilyId;
use famvault_service::{InboxProcessor, InboxReport};
use famvault_store::FileStore;

/// Runs the inbox orchestrator for every family that has pending inbox
/// files. A family whose sweep is already in flight is skipped, never
/// queued; it is picked up again on the next pass.
#[derive(Debug, Clone)]
pub struct InboxSweeper {
    /// File store, for the pending-family listing.
    files: Arc<dyn FileStore>,
    /// The per-family orchestrator.
    processor: Arc<InboxProcessor>,
}

/// Tallies for one sweep pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Families swept to completion.
    pub families_swept: u64,
    /// Families skipped because a sweep or mutation was in flight.
    pub families_skipped: u64,
    /// Families whose sweep returned an error.
    pub families_failed: u64,
    /// Files evaluated across all swept families.
    pub files_processed: u64,
    /// Files that matched a rule across all swept families.
    pub rules_matched: u64,
}

impl InboxSweeper {
    /// Create a new inbox sweeper.
    pub fn new(files: Arc<dyn FileStore>, processor: Arc<InboxProcessor>) -> Self {
        Self { files, processor }
    }

    /// Families that currently have at least one file in their Inbox.
    pub async fn pending_families(&self) -> Result<Vec<FamilyId>, AppError> {
        self.files.list_families_with_inbox_files().await
    }

    /// Sweep one family's Inbox, or return `Ok(None)` when the family is
    /// already being swept or mutated.
    pub async fn sweep_family(
        &self,
        family_id: FamilyId,
        cancel: &CancellationToken,
    ) -> Result<Option<InboxReport>, AppError> {
        self.processor.try_process_inbox(family_id, cancel).await
    }

    /// One full pass: sweep every family with pending inbox files, one at
    /// a time. A failing family is tallied and the pass moves on.
    pub async fn sweep_pending(
        &self,
        cancel: &CancellationToken,
    ) -> Result<SweepStats, AppError> {
        let families = self.pending_families().await?;

        let mut stats = SweepStats::default();
        for family_id in families {
            if cancel.is_cancelled() {
                tracing::info!(
                    families_swept = stats.families_swept,
                    "Sweep pass cancelled"
                );
                break;
            }
            match self.sweep_family(family_id, cancel).await {
                Ok(Some(report)) => {
                    stats.families_swept += 1;
                    stats.files_processed += report.files_processed;
                    stats.rules_matched += report.rules_matched;
                }
                Ok(None) => {
                    stats.families_skipped += 1;
                    tracing::debug!(family_id = %family_id, "Family sweep in flight, skipped");
                }
                Err(e) => {
                    stats.families_failed += 1;
                    tracing::error!(family_id = %family_id, error = %e, "Family sweep failed");
                }
            }
        }

        Ok(stats)
    }
}
