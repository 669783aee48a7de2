//! PostgreSQL processing log store.

use async_trait::async_trait;
use sqlx::PgPool;

use famvault_core::error::{AppError, ErrorKind};
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId};
use famvault_entity::processing::ProcessingLogEntry;

use crate::traits::ProcessingLogStore;

/// Processing log store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgProcessingLogStore {
    pool: PgPool,
}

impl PgProcessingLogStore {
    /// Create a new processing log store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProcessingLogStore for PgProcessingLogStore {
    async fn append(&self, entry: &ProcessingLogEntry) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO processing_log_entries \
             (id, family_id, file_id, file_name, rule_id, rule_name, action, \
              destination_folder_id, succeeded, error, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(entry.id)
        .bind(entry.family_id)
        .bind(entry.file_id)
        .bind(&entry.file_name)
        .bind(entry.rule_id)
        .bind(&entry.rule_name)
        .bind(&entry.action)
        .bind(entry.destination_folder_id)
        .bind(entry.succeeded)
        .bind(&entry.error)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to append log entry", e)
        })?;
        Ok(())
    }

    async fn list_by_family(
        &self,
        family_id: FamilyId,
        limit: i64,
    ) -> AppResult<Vec<ProcessingLogEntry>> {
        sqlx::query_as::<_, ProcessingLogEntry>(
            "SELECT * FROM processing_log_entries WHERE family_id = $1 \
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(family_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list log entries", e))
    }

    async fn list_by_file(&self, file_id: FileId) -> AppResult<Vec<ProcessingLogEntry>> {
        sqlx::query_as::<_, ProcessingLogEntry>(
            "SELECT * FROM processing_log_entries WHERE file_id = $1 ORDER BY created_at DESC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list log entries", e))
    }
}
