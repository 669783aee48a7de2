//! In-memory processing log store.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId};
use famvault_entity::processing::ProcessingLogEntry;

use crate::traits::ProcessingLogStore;

use super::db::MemoryDb;

/// Processing log store over the shared in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryProcessingLogStore {
    db: MemoryDb,
}

impl MemoryProcessingLogStore {
    /// Create a new processing log store over the given database.
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProcessingLogStore for MemoryProcessingLogStore {
    async fn append(&self, entry: &ProcessingLogEntry) -> AppResult<()> {
        let mut state = self.db.write().await;
        state.log_entries.push(entry.clone());
        Ok(())
    }

    async fn list_by_family(
        &self,
        family_id: FamilyId,
        limit: i64,
    ) -> AppResult<Vec<ProcessingLogEntry>> {
        let state = self.db.read().await;
        Ok(state
            .log_entries
            .iter()
            .rev()
            .filter(|e| e.family_id == family_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_by_file(&self, file_id: FileId) -> AppResult<Vec<ProcessingLogEntry>> {
        let state = self.db.read().await;
        Ok(state
            .log_entries
            .iter()
            .rev()
            .filter(|e| e.file_id == file_id)
            .cloned()
            .collect())
    }
}
