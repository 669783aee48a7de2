//! Processing log store trait.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId};
use famvault_entity::processing::ProcessingLogEntry;

/// Persistence operations for the append-only processing log.
#[async_trait]
pub trait ProcessingLogStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append one entry. Entries are never mutated afterwards.
    async fn append(&self, entry: &ProcessingLogEntry) -> AppResult<()>;

    /// List a family's most recent entries, newest first.
    async fn list_by_family(
        &self,
        family_id: FamilyId,
        limit: i64,
    ) -> AppResult<Vec<ProcessingLogEntry>>;

    /// List every entry recorded for one file, newest first.
    async fn list_by_file(&self, file_id: FileId) -> AppResult<Vec<ProcessingLogEntry>>;
}
