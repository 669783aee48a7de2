//! Permission grant management: setting, removing, and listing grants.
//!
//! Setting or removing a grant requires Manage on the resource, which
//! owners, family Admins, and holders of a Manage grant all satisfy.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use famvault_core::error::AppError;
use famvault_core::types::{GrantId, MemberId};
use famvault_entity::permission::{PermissionGrant, PermissionLevel, ResourceRef};
use famvault_policy::PermissionResolver;
use famvault_store::{MembershipStore, PermissionStore};

use crate::context::RequestContext;

/// Manages permission grants on files and folders.
#[derive(Debug, Clone)]
pub struct PermissionService {
    /// Grant store.
    grants: Arc<dyn PermissionStore>,
    /// Membership lookup (grantees must belong to the family).
    memberships: Arc<dyn MembershipStore>,
    /// Permission resolver.
    resolver: Arc<PermissionResolver>,
}

/// Data for setting a grant. Upserts by the unique
/// (resource type, resource id, member) tuple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetGrantRequest {
    /// The member receiving the grant.
    pub member_id: MemberId,
    /// The granted level.
    pub level: PermissionLevel,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(
        grants: Arc<dyn PermissionStore>,
        memberships: Arc<dyn MembershipStore>,
        resolver: Arc<PermissionResolver>,
    ) -> Self {
        Self {
            grants,
            memberships,
            resolver,
        }
    }

    /// Sets a member's grant on a resource, creating or updating it.
    pub async fn set_grant(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
        req: SetGrantRequest,
    ) -> Result<PermissionGrant, AppError> {
        self.resolver
            .require(
                ctx.member_id,
                resource,
                PermissionLevel::Manage,
                ctx.family_id,
            )
            .await?;

        if self
            .memberships
            .find(req.member_id, ctx.family_id)
            .await?
            .is_none()
        {
            return Err(AppError::validation(
                "Cannot grant permissions to someone outside the family",
            ));
        }

        let now = Utc::now();
        let grant = PermissionGrant {
            id: GrantId::new(),
            family_id: ctx.family_id,
            resource_type: resource.resource_type(),
            resource_id: resource.resource_uuid(),
            member_id: req.member_id,
            level: req.level,
            granted_by: ctx.member_id,
            created_at: now,
            updated_at: now,
        };
        let grant = self.grants.upsert(&grant).await?;

        info!(
            member_id = %ctx.member_id,
            grantee = %grant.member_id,
            resource = %resource,
            level = %grant.level,
            "Permission grant set"
        );

        Ok(grant)
    }

    /// Removes a member's grant from a resource.
    pub async fn remove_grant(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
        member_id: MemberId,
    ) -> Result<(), AppError> {
        self.resolver
            .require(
                ctx.member_id,
                resource,
                PermissionLevel::Manage,
                ctx.family_id,
            )
            .await?;

        let removed = self.grants.remove(resource, member_id).await?;
        if !removed {
            return Err(AppError::not_found(
                "No grant exists for this member on this resource",
            ));
        }

        info!(
            member_id = %ctx.member_id,
            grantee = %member_id,
            resource = %resource,
            "Permission grant removed"
        );

        Ok(())
    }

    /// Lists every grant on a resource, enforcing View permission.
    pub async fn list_grants(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
    ) -> Result<Vec<PermissionGrant>, AppError> {
        self.resolver
            .require(ctx.member_id, resource, PermissionLevel::View, ctx.family_id)
            .await?;

        self.grants.list_for_resource(resource).await
    }

    /// Whether any grant row exists for the resource (the "restricted"
    /// badge).
    pub async fn is_restricted(
        &self,
        _ctx: &RequestContext,
        resource: ResourceRef,
    ) -> Result<bool, AppError> {
        self.resolver.is_resource_restricted(resource).await
    }
}
