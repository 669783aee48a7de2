//! PostgreSQL folder store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use famvault_core::error::{AppError, ErrorKind};
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, FolderId};
use famvault_entity::folder::Folder;

use crate::traits::FolderStore;

/// Folder store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgFolderStore {
    pool: PgPool,
}

impl PgFolderStore {
    /// Create a new folder store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FolderStore for PgFolderStore {
    async fn insert(&self, folder: &Folder) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO folders (id, family_id, parent_id, name, path, kind, created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(folder.id)
        .bind(folder.family_id)
        .bind(folder.parent_id)
        .bind(&folder.name)
        .bind(&folder.path)
        .bind(folder.kind)
        .bind(folder.created_by)
        .bind(folder.created_at)
        .bind(folder.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert folder", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    async fn find_root(&self, family_id: FamilyId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>("SELECT * FROM folders WHERE family_id = $1 AND kind = 'root'")
            .bind(family_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find root", e))
    }

    async fn find_inbox(&self, family_id: FamilyId) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE family_id = $1 AND kind = 'inbox'",
        )
        .bind(family_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find inbox", e))
    }

    async fn list_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE parent_id = $1 ORDER BY name ASC",
        )
        .bind(parent_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE family_id = $1 ORDER BY path ASC, name ASC",
        )
        .bind(family_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folders", e))
    }

    async fn list_descendants(
        &self,
        family_id: FamilyId,
        path_prefix: &str,
    ) -> AppResult<Vec<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE family_id = $1 AND path LIKE $2 || '%' \
             ORDER BY path ASC, name ASC",
        )
        .bind(family_id)
        .bind(path_prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list descendants", e))
    }

    async fn rename(&self, id: FolderId, new_name: &str) -> AppResult<Folder> {
        sqlx::query_as::<_, Folder>(
            "UPDATE folders SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to rename folder", e))?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))
    }

    async fn move_subtree(
        &self,
        id: FolderId,
        new_parent_id: FolderId,
        new_path: &str,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<Folder> {
        let mut tx = self.pool.begin().await?;

        let folder = sqlx::query_as::<_, Folder>(
            "UPDATE folders SET parent_id = $2, path = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(new_parent_id)
        .bind(new_path)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;

        // One-pass rewrite of every descendant path, computed from the
        // same transactional snapshot as the folder update above.
        sqlx::query(
            "UPDATE folders SET path = $2 || substr(path, char_length($1) + 1), \
             updated_at = NOW() \
             WHERE family_id = $3 AND path LIKE $1 || '%'",
        )
        .bind(old_prefix)
        .bind(new_prefix)
        .bind(folder.family_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(folder)
    }

    async fn remove_subtree(
        &self,
        family_id: FamilyId,
        folder_ids: &[FolderId],
        file_ids: &[FileId],
    ) -> AppResult<()> {
        let folder_uuids: Vec<Uuid> = folder_ids.iter().map(|f| f.into_uuid()).collect();
        let file_uuids: Vec<Uuid> = file_ids.iter().map(|f| f.into_uuid()).collect();

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM permission_grants \
             WHERE (resource_type = 'folder' AND resource_id = ANY($1)) \
                OR (resource_type = 'file' AND resource_id = ANY($2))",
        )
        .bind(&folder_uuids)
        .bind(&file_uuids)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM file_tags WHERE file_id = ANY($1)")
            .bind(&file_uuids)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM album_files WHERE file_id = ANY($1)")
            .bind(&file_uuids)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "UPDATE albums SET cover_file_id = NULL, updated_at = NOW() \
             WHERE cover_file_id = ANY($1)",
        )
        .bind(&file_uuids)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM files WHERE id = ANY($1)")
            .bind(&file_uuids)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM folders WHERE family_id = $2 AND id = ANY($1)")
            .bind(&folder_uuids)
            .bind(family_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}
