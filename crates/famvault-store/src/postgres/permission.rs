//! PostgreSQL permission grant store.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use famvault_core::error::{AppError, ErrorKind};
use famvault_core::result::AppResult;
use famvault_core::types::{FolderId, MemberId};
use famvault_entity::permission::{PermissionGrant, ResourceRef};

use crate::traits::PermissionStore;

/// Permission grant store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgPermissionStore {
    pool: PgPool,
}

impl PgPermissionStore {
    /// Create a new permission store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PermissionStore for PgPermissionStore {
    async fn find_for_member(
        &self,
        resource: ResourceRef,
        member_id: MemberId,
    ) -> AppResult<Option<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM permission_grants \
             WHERE resource_type = $1 AND resource_id = $2 AND member_id = $3",
        )
        .bind(resource.resource_type())
        .bind(resource.resource_uuid())
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find grant", e))
    }

    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<PermissionGrant>> {
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM permission_grants \
             WHERE resource_type = $1 AND resource_id = $2 ORDER BY created_at ASC",
        )
        .bind(resource.resource_type())
        .bind(resource.resource_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list grants", e))
    }

    async fn exists_for_resource(&self, resource: ResourceRef) -> AppResult<bool> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM permission_grants \
             WHERE resource_type = $1 AND resource_id = $2)",
        )
        .bind(resource.resource_type())
        .bind(resource.resource_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check grants", e))?;
        Ok(row.0)
    }

    async fn exists_for_folders(&self, folder_ids: &[FolderId]) -> AppResult<bool> {
        let uuids: Vec<Uuid> = folder_ids.iter().map(|f| f.into_uuid()).collect();
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM permission_grants \
             WHERE resource_type = 'folder' AND resource_id = ANY($1))",
        )
        .bind(&uuids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to check grants", e))?;
        Ok(row.0)
    }

    async fn find_first_folder_grant(
        &self,
        folder_ids: &[FolderId],
        member_id: MemberId,
    ) -> AppResult<Option<PermissionGrant>> {
        let uuids: Vec<Uuid> = folder_ids.iter().map(|f| f.into_uuid()).collect();
        // array_position preserves the caller's walk order, so the nearest
        // folder with a grant for this member wins.
        sqlx::query_as::<_, PermissionGrant>(
            "SELECT * FROM permission_grants \
             WHERE resource_type = 'folder' AND resource_id = ANY($1) AND member_id = $2 \
             ORDER BY array_position($1, resource_id) ASC LIMIT 1",
        )
        .bind(&uuids)
        .bind(member_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to walk grants", e))
    }

    async fn upsert(&self, grant: &PermissionGrant) -> AppResult<PermissionGrant> {
        sqlx::query_as::<_, PermissionGrant>(
            "INSERT INTO permission_grants \
             (id, family_id, resource_type, resource_id, member_id, level, granted_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             ON CONFLICT (resource_type, resource_id, member_id) \
             DO UPDATE SET level = EXCLUDED.level, granted_by = EXCLUDED.granted_by, updated_at = NOW() \
             RETURNING *",
        )
        .bind(grant.id)
        .bind(grant.family_id)
        .bind(grant.resource_type)
        .bind(grant.resource_id)
        .bind(grant.member_id)
        .bind(grant.level)
        .bind(grant.granted_by)
        .bind(grant.created_at)
        .bind(grant.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert grant", e))
    }

    async fn remove(&self, resource: ResourceRef, member_id: MemberId) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM permission_grants \
             WHERE resource_type = $1 AND resource_id = $2 AND member_id = $3",
        )
        .bind(resource.resource_type())
        .bind(resource.resource_uuid())
        .bind(member_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove grant", e))?;
        Ok(result.rows_affected() > 0)
    }
}
