//! PostgreSQL tag store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use famvault_core::error::{AppError, ErrorKind};
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, TagId};
use famvault_entity::tag::Tag;

use crate::traits::TagStore;

/// Tag store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgTagStore {
    pool: PgPool,
}

impl PgTagStore {
    /// Create a new tag store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TagStore for PgTagStore {
    async fn insert(&self, tag: &Tag) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO tags (id, family_id, name, color, created_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(tag.id)
        .bind(tag.family_id)
        .bind(&tag.name)
        .bind(&tag.color)
        .bind(tag.created_by)
        .bind(tag.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.constraint() == Some("tags_family_id_lower_name_idx") =>
            {
                AppError::conflict(format!("Tag '{}' already exists", tag.name))
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert tag", e),
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: TagId) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tag", e))
    }

    async fn find_by_name(&self, family_id: FamilyId, name: &str) -> AppResult<Option<Tag>> {
        sqlx::query_as::<_, Tag>(
            "SELECT * FROM tags WHERE family_id = $1 AND lower(name) = lower($2)",
        )
        .bind(family_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find tag by name", e))
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE family_id = $1 ORDER BY name ASC")
            .bind(family_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))
    }

    async fn list_by_ids(&self, ids: &[TagId]) -> AppResult<Vec<Tag>> {
        let uuids: Vec<Uuid> = ids.iter().map(|t| t.into_uuid()).collect();
        sqlx::query_as::<_, Tag>("SELECT * FROM tags WHERE id = ANY($1) ORDER BY name ASC")
            .bind(&uuids)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tags", e))
    }

    async fn rename(&self, id: TagId, new_name: &str) -> AppResult<Tag> {
        sqlx::query_as::<_, Tag>("UPDATE tags SET name = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(new_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err)
                    if db_err.constraint() == Some("tags_family_id_lower_name_idx") =>
                {
                    AppError::conflict(format!("Tag '{new_name}' already exists"))
                }
                _ => AppError::with_source(ErrorKind::Database, "Failed to rename tag", e),
            })?
            .ok_or_else(|| AppError::not_found(format!("Tag {id} not found")))
    }

    async fn remove(&self, id: TagId) -> AppResult<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM file_tags WHERE tag_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM tags WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    async fn attach(&self, file_id: FileId, tag_id: TagId) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT INTO file_tags (file_id, tag_id, created_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (file_id, tag_id) DO NOTHING",
        )
        .bind(file_id)
        .bind(tag_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to attach tag", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn detach(&self, file_id: FileId, tag_id: TagId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM file_tags WHERE file_id = $1 AND tag_id = $2")
            .bind(file_id)
            .bind(tag_id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to detach tag", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<Tag>> {
        sqlx::query_as::<_, Tag>(
            "SELECT t.* FROM tags t \
             INNER JOIN file_tags ft ON ft.tag_id = t.id \
             WHERE ft.file_id = $1 ORDER BY t.name ASC",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list file tags", e))
    }
}
