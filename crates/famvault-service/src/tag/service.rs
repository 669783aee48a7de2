//! Tag CRUD and idempotent file tagging.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use famvault_core::error::AppError;
use famvault_core::types::{FileId, TagId};
use famvault_entity::permission::{PermissionLevel, ResourceRef};
use famvault_entity::tag::Tag;
use famvault_policy::PermissionResolver;
use famvault_store::{FileStore, MembershipStore, TagStore};

use crate::context::RequestContext;

/// Manages tags. Tag names are unique per family, case-insensitive.
#[derive(Debug, Clone)]
pub struct TagService {
    /// Tag store.
    tags: Arc<dyn TagStore>,
    /// File store (association targets).
    files: Arc<dyn FileStore>,
    /// Membership lookup.
    memberships: Arc<dyn MembershipStore>,
    /// Permission resolver.
    resolver: Arc<PermissionResolver>,
}

/// Data for creating a tag.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTagRequest {
    /// Tag name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Optional display color (e.g., `"#ff8800"`).
    pub color: Option<String>,
}

impl TagService {
    /// Creates a new tag service.
    pub fn new(
        tags: Arc<dyn TagStore>,
        files: Arc<dyn FileStore>,
        memberships: Arc<dyn MembershipStore>,
        resolver: Arc<PermissionResolver>,
    ) -> Self {
        Self {
            tags,
            files,
            memberships,
            resolver,
        }
    }

    /// Creates a tag. Conflicts when the name is already used in the
    /// family.
    pub async fn create_tag(
        &self,
        ctx: &RequestContext,
        req: CreateTagRequest,
    ) -> Result<Tag, AppError> {
        self.require_member(ctx).await?;
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Tag name cannot be empty"));
        }

        let tag = Tag {
            id: TagId::new(),
            family_id: ctx.family_id,
            name: req.name,
            color: req.color,
            created_by: ctx.member_id,
            created_at: Utc::now(),
        };
        self.tags.insert(&tag).await?;

        info!(member_id = %ctx.member_id, tag_id = %tag.id, name = %tag.name, "Tag created");

        Ok(tag)
    }

    /// Renames a tag. Conflicts when the name is taken.
    pub async fn rename_tag(
        &self,
        ctx: &RequestContext,
        tag_id: TagId,
        new_name: &str,
    ) -> Result<Tag, AppError> {
        self.require_member(ctx).await?;
        if new_name.trim().is_empty() {
            return Err(AppError::validation("Tag name cannot be empty"));
        }
        self.load_tag(ctx, tag_id).await?;

        let tag = self.tags.rename(tag_id, new_name).await?;

        info!(member_id = %ctx.member_id, tag_id = %tag_id, new_name = %new_name, "Tag renamed");

        Ok(tag)
    }

    /// Deletes a tag and every association to it.
    pub async fn delete_tag(&self, ctx: &RequestContext, tag_id: TagId) -> Result<(), AppError> {
        self.require_member(ctx).await?;
        self.load_tag(ctx, tag_id).await?;

        self.tags.remove(tag_id).await?;

        info!(member_id = %ctx.member_id, tag_id = %tag_id, "Tag deleted");

        Ok(())
    }

    /// Lists the family's tags, ordered by name.
    pub async fn list_tags(&self, ctx: &RequestContext) -> Result<Vec<Tag>, AppError> {
        self.require_member(ctx).await?;
        self.tags.list_by_family(ctx.family_id).await
    }

    /// Tags a file. Idempotent; returns `true` only when the association
    /// was newly created.
    pub async fn tag_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        tag_id: TagId,
    ) -> Result<bool, AppError> {
        self.require_file_edit(ctx, file_id).await?;
        self.load_tag(ctx, tag_id).await?;

        let added = self.tags.attach(file_id, tag_id).await?;
        if added {
            info!(member_id = %ctx.member_id, file_id = %file_id, tag_id = %tag_id, "File tagged");
        }
        Ok(added)
    }

    /// Untags a file. Idempotent; returns `true` only when an association
    /// was actually removed.
    pub async fn untag_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        tag_id: TagId,
    ) -> Result<bool, AppError> {
        self.require_file_edit(ctx, file_id).await?;
        self.load_tag(ctx, tag_id).await?;

        let removed = self.tags.detach(file_id, tag_id).await?;
        if removed {
            info!(member_id = %ctx.member_id, file_id = %file_id, tag_id = %tag_id, "File untagged");
        }
        Ok(removed)
    }

    /// Lists the tags attached to a file, enforcing View on the file.
    pub async fn list_file_tags(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<Vec<Tag>, AppError> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if file.family_id != ctx.family_id {
            return Err(AppError::forbidden("File belongs to another family"));
        }
        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::File(file_id),
                PermissionLevel::View,
                ctx.family_id,
            )
            .await?;

        self.tags.list_for_file(file_id).await
    }

    async fn load_tag(&self, ctx: &RequestContext, tag_id: TagId) -> Result<Tag, AppError> {
        let tag = self
            .tags
            .find_by_id(tag_id)
            .await?
            .ok_or_else(|| AppError::not_found("Tag not found"))?;
        if tag.family_id != ctx.family_id {
            return Err(AppError::forbidden("Tag belongs to another family"));
        }
        Ok(tag)
    }

    async fn require_file_edit(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<(), AppError> {
        let file = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if file.family_id != ctx.family_id {
            return Err(AppError::forbidden("File belongs to another family"));
        }
        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::File(file_id),
                PermissionLevel::Edit,
                ctx.family_id,
            )
            .await?;
        Ok(())
    }

    async fn require_member(&self, ctx: &RequestContext) -> Result<(), AppError> {
        self.memberships
            .role_of(ctx.member_id, ctx.family_id)
            .await?
            .ok_or_else(|| AppError::forbidden("Not a member of this family"))?;
        Ok(())
    }
}
