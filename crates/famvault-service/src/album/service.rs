//! Album CRUD and idempotent album membership with cover auto-selection.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use famvault_core::error::AppError;
use famvault_core::types::{AlbumId, FileId};
use famvault_entity::album::Album;
use famvault_entity::file::StoredFile;
use famvault_entity::permission::{PermissionLevel, ResourceRef};
use famvault_policy::PermissionResolver;
use famvault_store::{AlbumStore, FileStore, MembershipStore};

use crate::context::RequestContext;

/// Manages albums.
#[derive(Debug, Clone)]
pub struct AlbumService {
    /// Album store.
    albums: Arc<dyn AlbumStore>,
    /// File store (membership targets).
    files: Arc<dyn FileStore>,
    /// Membership lookup.
    memberships: Arc<dyn MembershipStore>,
    /// Permission resolver.
    resolver: Arc<PermissionResolver>,
}

/// Data for creating an album.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAlbumRequest {
    /// Album name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
}

impl AlbumService {
    /// Creates a new album service.
    pub fn new(
        albums: Arc<dyn AlbumStore>,
        files: Arc<dyn FileStore>,
        memberships: Arc<dyn MembershipStore>,
        resolver: Arc<PermissionResolver>,
    ) -> Self {
        Self {
            albums,
            files,
            memberships,
            resolver,
        }
    }

    /// Creates an album.
    pub async fn create_album(
        &self,
        ctx: &RequestContext,
        req: CreateAlbumRequest,
    ) -> Result<Album, AppError> {
        self.require_member(ctx).await?;
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Album name cannot be empty"));
        }

        let now = Utc::now();
        let album = Album {
            id: AlbumId::new(),
            family_id: ctx.family_id,
            name: req.name,
            cover_file_id: None,
            created_by: ctx.member_id,
            created_at: now,
            updated_at: now,
        };
        self.albums.insert(&album).await?;

        info!(member_id = %ctx.member_id, album_id = %album.id, "Album created");

        Ok(album)
    }

    /// Renames an album.
    pub async fn rename_album(
        &self,
        ctx: &RequestContext,
        album_id: AlbumId,
        new_name: &str,
    ) -> Result<Album, AppError> {
        self.require_member(ctx).await?;
        if new_name.trim().is_empty() {
            return Err(AppError::validation("Album name cannot be empty"));
        }
        self.load_album(ctx, album_id).await?;

        let album = self.albums.rename(album_id, new_name).await?;

        info!(member_id = %ctx.member_id, album_id = %album_id, new_name = %new_name, "Album renamed");

        Ok(album)
    }

    /// Deletes an album and its file associations. Files themselves are
    /// untouched.
    pub async fn delete_album(
        &self,
        ctx: &RequestContext,
        album_id: AlbumId,
    ) -> Result<(), AppError> {
        self.require_member(ctx).await?;
        self.load_album(ctx, album_id).await?;

        self.albums.remove(album_id).await?;

        info!(member_id = %ctx.member_id, album_id = %album_id, "Album deleted");

        Ok(())
    }

    /// Lists the family's albums, ordered by name.
    pub async fn list_albums(&self, ctx: &RequestContext) -> Result<Vec<Album>, AppError> {
        self.require_member(ctx).await?;
        self.albums.list_by_family(ctx.family_id).await
    }

    /// Adds a file to an album. Idempotent; returns `true` only when the
    /// association was newly created. The first file added while the
    /// album has no cover becomes the cover.
    pub async fn add_file(
        &self,
        ctx: &RequestContext,
        album_id: AlbumId,
        file_id: FileId,
    ) -> Result<bool, AppError> {
        self.require_member(ctx).await?;
        let album = self.load_album(ctx, album_id).await?;
        self.require_file_view(ctx, file_id).await?;

        let added = self.albums.add_file(album_id, file_id).await?;
        if added && album.cover_file_id.is_none() {
            self.albums.set_cover(album_id, Some(file_id)).await?;
        }
        if added {
            info!(member_id = %ctx.member_id, album_id = %album_id, file_id = %file_id, "File added to album");
        }

        Ok(added)
    }

    /// Removes a file from an album. Idempotent; returns `true` only when
    /// an association was actually removed. Removing the cover file
    /// clears the cover.
    pub async fn remove_file(
        &self,
        ctx: &RequestContext,
        album_id: AlbumId,
        file_id: FileId,
    ) -> Result<bool, AppError> {
        self.require_member(ctx).await?;
        let album = self.load_album(ctx, album_id).await?;

        let removed = self.albums.remove_file(album_id, file_id).await?;
        if removed && album.cover_file_id == Some(file_id) {
            self.albums.set_cover(album_id, None).await?;
        }
        if removed {
            info!(member_id = %ctx.member_id, album_id = %album_id, file_id = %file_id, "File removed from album");
        }

        Ok(removed)
    }

    /// Lists the files in an album, oldest addition first.
    pub async fn list_album_files(
        &self,
        ctx: &RequestContext,
        album_id: AlbumId,
    ) -> Result<Vec<StoredFile>, AppError> {
        self.require_member(ctx).await?;
        self.load_album(ctx, album_id).await?;
        self.albums.list_files(album_id).await
    }

    async fn load_album(&self, ctx: &RequestContext, album_id: AlbumId) -> Result<Album, AppError> {
        let album = self
            .albums
            .find_by_id(album_id)
            .await?
            .ok_or_else(|| AppError::not_found("Album not found"))?;
        if album.family_id != ctx.family_id {
            return Err(AppError::forbidden("Album belongs to another family"));
        }
        Ok(album)
    }

    async fn require_file_view(
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
                PermissionLevel::View,
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
