//! PostgreSQL file store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use famvault_core::error::{AppError, ErrorKind};
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, FolderId};
use famvault_entity::file::StoredFile;

use crate::traits::FileStore;

/// File metadata store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    /// Create a new file store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn insert(&self, file: &StoredFile) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO files (id, family_id, folder_id, name, mime_type, size_bytes, \
             storage_key, checksum_sha256, uploaded_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(file.id)
        .bind(file.family_id)
        .bind(file.folder_id)
        .bind(&file.name)
        .bind(&file.mime_type)
        .bind(file.size_bytes)
        .bind(&file.storage_key)
        .bind(&file.checksum_sha256)
        .bind(file.uploaded_by)
        .bind(file.created_at)
        .bind(file.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert file", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: FileId) -> AppResult<Option<StoredFile>> {
        sqlx::query_as::<_, StoredFile>("SELECT * FROM files WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    async fn list_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<StoredFile>> {
        sqlx::query_as::<_, StoredFile>(
            "SELECT * FROM files WHERE folder_id = $1 ORDER BY created_at ASC, name ASC",
        )
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn list_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<Vec<StoredFile>> {
        let uuids: Vec<Uuid> = folder_ids.iter().map(|f| f.into_uuid()).collect();
        sqlx::query_as::<_, StoredFile>(
            "SELECT * FROM files WHERE folder_id = ANY($1) ORDER BY created_at ASC, name ASC",
        )
        .bind(&uuids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    async fn update_folder(&self, id: FileId, folder_id: FolderId) -> AppResult<StoredFile> {
        sqlx::query_as::<_, StoredFile>(
            "UPDATE files SET folder_id = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(folder_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to move file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn rename(&self, id: FileId, new_name: &str) -> AppResult<StoredFile> {
        sqlx::query_as::<_, StoredFile>(
            "UPDATE files SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename file", e))?
        .ok_or_else(|| AppError::not_found(format!("File {id} not found")))
    }

    async fn remove(&self, id: FileId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM permission_grants WHERE resource_type = 'file' AND resource_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM file_tags WHERE file_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM album_files WHERE file_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE albums SET cover_file_id = NULL, updated_at = NOW() WHERE cover_file_id = $1",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query("DELETE FROM files WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_families_with_inbox_files(&self) -> AppResult<Vec<FamilyId>> {
        let rows: Vec<(FamilyId,)> = sqlx::query_as(
            "SELECT DISTINCT f.family_id FROM files f \
             INNER JOIN folders d ON f.folder_id = d.id \
             WHERE d.kind = 'inbox'",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list inbox families", e)
        })?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
