//! In-memory permission grant store.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;

use famvault_core::result::AppResult;
use famvault_core::types::{FolderId, MemberId};
use famvault_entity::permission::{PermissionGrant, ResourceRef, ResourceType};

use crate::traits::PermissionStore;

use super::db::MemoryDb;

/// Permission grant store over the shared in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryPermissionStore {
    db: MemoryDb,
}

impl MemoryPermissionStore {
    /// Create a new permission store over the given database.
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PermissionStore for MemoryPermissionStore {
    async fn find_for_member(
        &self,
        resource: ResourceRef,
        member_id: MemberId,
    ) -> AppResult<Option<PermissionGrant>> {
        let state = self.db.read().await;
        let key = (resource.resource_type(), resource.resource_uuid(), member_id);
        Ok(state.grants.get(&key).cloned())
    }

    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<PermissionGrant>> {
        let state = self.db.read().await;
        let rtype = resource.resource_type();
        let rid = resource.resource_uuid();
        let mut grants: Vec<PermissionGrant> = state
            .grants
            .iter()
            .filter(|((t, id, _), _)| *t == rtype && *id == rid)
            .map(|(_, grant)| grant.clone())
            .collect();
        grants.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(grants)
    }

    async fn exists_for_resource(&self, resource: ResourceRef) -> AppResult<bool> {
        let state = self.db.read().await;
        let rtype = resource.resource_type();
        let rid = resource.resource_uuid();
        Ok(state
            .grants
            .keys()
            .any(|(t, id, _)| *t == rtype && *id == rid))
    }

    async fn exists_for_folders(&self, folder_ids: &[FolderId]) -> AppResult<bool> {
        let set: HashSet<uuid::Uuid> = folder_ids.iter().map(|f| f.into_uuid()).collect();
        let state = self.db.read().await;
        Ok(state
            .grants
            .keys()
            .any(|(t, id, _)| *t == ResourceType::Folder && set.contains(id)))
    }

    async fn find_first_folder_grant(
        &self,
        folder_ids: &[FolderId],
        member_id: MemberId,
    ) -> AppResult<Option<PermissionGrant>> {
        let state = self.db.read().await;
        for folder_id in folder_ids {
            let key = (ResourceType::Folder, folder_id.into_uuid(), member_id);
            if let Some(grant) = state.grants.get(&key) {
                return Ok(Some(grant.clone()));
            }
        }
        Ok(None)
    }

    async fn upsert(&self, grant: &PermissionGrant) -> AppResult<PermissionGrant> {
        let mut state = self.db.write().await;
        let key = (grant.resource_type, grant.resource_id, grant.member_id);
        let stored = state
            .grants
            .entry(key)
            .and_modify(|existing| {
                existing.level = grant.level;
                existing.granted_by = grant.granted_by;
                existing.updated_at = Utc::now();
            })
            .or_insert_with(|| grant.clone());
        Ok(stored.clone())
    }

    async fn remove(&self, resource: ResourceRef, member_id: MemberId) -> AppResult<bool> {
        let mut state = self.db.write().await;
        let key = (resource.resource_type(), resource.resource_uuid(), member_id);
        Ok(state.grants.remove(&key).is_some())
    }
}
