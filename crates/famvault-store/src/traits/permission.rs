//! Permission grant store trait.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FolderId, MemberId};
use famvault_entity::permission::{PermissionGrant, ResourceRef};

/// Persistence operations for permission grants.
#[async_trait]
pub trait PermissionStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find the grant for one member on one resource.
    async fn find_for_member(
        &self,
        resource: ResourceRef,
        member_id: MemberId,
    ) -> AppResult<Option<PermissionGrant>>;

    /// List every grant on a resource.
    async fn list_for_resource(&self, resource: ResourceRef) -> AppResult<Vec<PermissionGrant>>;

    /// Whether any grant exists for this exact resource. A resource with
    /// no grants is unrestricted.
    async fn exists_for_resource(&self, resource: ResourceRef) -> AppResult<bool>;

    /// Whether any grant exists on any of the given folders. Used for the
    /// chain-aware file restriction check.
    async fn exists_for_folders(&self, folder_ids: &[FolderId]) -> AppResult<bool>;

    /// Walk the given folders in order and return the member's grant on
    /// the first folder that has one. The caller supplies the chain
    /// outward-to-root; first match wins.
    async fn find_first_folder_grant(
        &self,
        folder_ids: &[FolderId],
        member_id: MemberId,
    ) -> AppResult<Option<PermissionGrant>>;

    /// Insert or update a grant, keyed by the unique
    /// (resource type, resource id, member) tuple.
    async fn upsert(&self, grant: &PermissionGrant) -> AppResult<PermissionGrant>;

    /// Remove the grant for one member on one resource. Returns `false`
    /// when no such grant existed.
    async fn remove(&self, resource: ResourceRef, member_id: MemberId) -> AppResult<bool>;
}
