//! Effective permission resolver.
//!
//! Resolution order:
//! 1. Resolve the resource and confirm it belongs to the caller's family.
//! 2. Owner bypass: the file uploader / folder creator has full access.
//! 3. Membership: non-members are denied; family Admins and the family
//!    Owner have full access.
//! 4. Restriction check: a resource with no applicable grant rows is
//!    unrestricted and open to every member at any level. A folder is
//!    restricted only by grants on itself; a file is restricted by grants
//!    on itself or on any folder in its ancestry chain.
//! 5. Grant lookup: a direct grant decides; a file without one inherits
//!    from the first ancestor folder (nearest first) carrying a grant for
//!    the actor.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use famvault_core::error::AppError;
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FolderId, MemberId};
use famvault_entity::folder::path;
use famvault_entity::permission::{PermissionLevel, ResourceRef};
use famvault_store::{FileStore, FolderStore, MembershipStore, PermissionStore};

/// Result of resolving a member's effective access to a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessDecision {
    /// Whether access at the required level is granted.
    pub granted: bool,
    /// The grant level backing the decision, when one applies.
    pub level: Option<PermissionLevel>,
    /// Where the decision came from.
    pub source: PermissionSource,
}

impl AccessDecision {
    fn allow(level: Option<PermissionLevel>, source: PermissionSource) -> Self {
        Self {
            granted: true,
            level,
            source,
        }
    }

    fn deny(level: Option<PermissionLevel>) -> Self {
        Self {
            granted: false,
            level,
            source: PermissionSource::Denied,
        }
    }
}

/// Where an access decision was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionSource {
    /// The actor uploaded the file or created the folder.
    ResourceOwner,
    /// The actor is a family Admin or the family Owner.
    RoleBypass,
    /// No grant rows apply to the resource; it is open to every member.
    Unrestricted,
    /// A grant on the resource itself.
    DirectGrant,
    /// A grant on an ancestor folder of the file.
    InheritedGrant,
    /// No membership, or no applicable grant at the required level.
    Denied,
}

/// The resolved resource: who owns it and, for files, the folder chain
/// to walk for inherited grants (owning folder first, Root last).
struct Target {
    owner: MemberId,
    chain: Vec<FolderId>,
}

/// Resolves effective permissions against the stores.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
    grants: Arc<dyn PermissionStore>,
    memberships: Arc<dyn MembershipStore>,
}

impl PermissionResolver {
    /// Create a new resolver over the given stores.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        grants: Arc<dyn PermissionStore>,
        memberships: Arc<dyn MembershipStore>,
    ) -> Self {
        Self {
            folders,
            files,
            grants,
            memberships,
        }
    }

    /// Resolve the actor's effective access to a resource.
    ///
    /// Fails with `NotFound`/`Forbidden` when the resource itself cannot be
    /// resolved within the family; an actor without access yields a denied
    /// decision, not an error.
    pub async fn resolve(
        &self,
        actor: MemberId,
        resource: ResourceRef,
        required: PermissionLevel,
        family_id: FamilyId,
    ) -> AppResult<AccessDecision> {
        let target = self.load_target(resource, family_id).await?;

        if target.owner == actor {
            return Ok(AccessDecision::allow(
                Some(PermissionLevel::Manage),
                PermissionSource::ResourceOwner,
            ));
        }

        let Some(role) = self.memberships.role_of(actor, family_id).await? else {
            return Ok(AccessDecision::deny(None));
        };
        if role.is_admin_or_above() {
            return Ok(AccessDecision::allow(
                Some(PermissionLevel::Manage),
                PermissionSource::RoleBypass,
            ));
        }

        let restricted = match resource {
            ResourceRef::Folder(_) => self.grants.exists_for_resource(resource).await?,
            ResourceRef::File(_) => {
                self.grants.exists_for_resource(resource).await?
                    || self.grants.exists_for_folders(&target.chain).await?
            }
        };
        if !restricted {
            return Ok(AccessDecision::allow(None, PermissionSource::Unrestricted));
        }

        if let Some(grant) = self.grants.find_for_member(resource, actor).await? {
            if grant.level.has_at_least(&required) {
                return Ok(AccessDecision::allow(
                    Some(grant.level),
                    PermissionSource::DirectGrant,
                ));
            }
            return Ok(AccessDecision::deny(Some(grant.level)));
        }

        // Only files inherit; a folder's own grants have already decided.
        if matches!(resource, ResourceRef::File(_)) {
            if let Some(grant) = self
                .grants
                .find_first_folder_grant(&target.chain, actor)
                .await?
            {
                if grant.level.has_at_least(&required) {
                    return Ok(AccessDecision::allow(
                        Some(grant.level),
                        PermissionSource::InheritedGrant,
                    ));
                }
                return Ok(AccessDecision::deny(Some(grant.level)));
            }
        }

        Ok(AccessDecision::deny(None))
    }

    /// Whether the actor holds the required level on the resource.
    pub async fn has_permission(
        &self,
        actor: MemberId,
        resource: ResourceRef,
        required: PermissionLevel,
        family_id: FamilyId,
    ) -> AppResult<bool> {
        Ok(self
            .resolve(actor, resource, required, family_id)
            .await?
            .granted)
    }

    /// Resolve and fail with `Forbidden` when access is denied.
    pub async fn require(
        &self,
        actor: MemberId,
        resource: ResourceRef,
        required: PermissionLevel,
        family_id: FamilyId,
    ) -> AppResult<AccessDecision> {
        let decision = self.resolve(actor, resource, required, family_id).await?;
        if !decision.granted {
            debug!(
                actor = %actor,
                resource = %resource,
                required = %required,
                "Access denied"
            );
            return Err(AppError::forbidden(
                "You do not have permission to perform this action on this resource",
            ));
        }
        Ok(decision)
    }

    /// Whether any grant row exists for the exact resource tuple.
    pub async fn is_resource_restricted(&self, resource: ResourceRef) -> AppResult<bool> {
        self.grants.exists_for_resource(resource).await
    }

    async fn load_target(&self, resource: ResourceRef, family_id: FamilyId) -> AppResult<Target> {
        match resource {
            ResourceRef::File(id) => {
                let file = self
                    .files
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
                if file.family_id != family_id {
                    return Err(AppError::forbidden("File belongs to another family"));
                }
                let folder = self.folders.find_by_id(file.folder_id).await?.ok_or_else(|| {
                    AppError::internal(format!("File {id} references a missing folder"))
                })?;
                let mut chain = vec![folder.id];
                chain.extend(path::ancestor_ids_outward(&folder.path));
                Ok(Target {
                    owner: file.uploaded_by,
                    chain,
                })
            }
            ResourceRef::Folder(id) => {
                let folder = self
                    .folders
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
                if folder.family_id != family_id {
                    return Err(AppError::forbidden("Folder belongs to another family"));
                }
                Ok(Target {
                    owner: folder.created_by,
                    chain: Vec::new(),
                })
            }
        }
    }
}
