//! File metadata CRUD with permission enforcement.
//!
//! Blob bytes are written and served by the out-of-scope transport layer;
//! this service owns the metadata rows and the folder references the
//! hierarchy and rule engine operate on.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use famvault_core::error::AppError;
use famvault_core::traits::storage::BlobStore;
use famvault_core::types::{FileId, FolderId};
use famvault_entity::file::StoredFile;
use famvault_entity::permission::{PermissionLevel, ResourceRef};
use famvault_policy::PermissionResolver;
use famvault_store::{FileStore, FolderStore};

use crate::context::RequestContext;
use crate::folder::FolderService;

/// Handles file metadata with permission checks.
#[derive(Debug, Clone)]
pub struct FileService {
    /// File store.
    files: Arc<dyn FileStore>,
    /// Folder store (destination lookups).
    folders: Arc<dyn FolderStore>,
    /// Blob store (best-effort content deletion).
    blobs: Arc<dyn BlobStore>,
    /// Permission resolver.
    resolver: Arc<PermissionResolver>,
    /// Folder service (Inbox bootstrap for uploads).
    folder_service: Arc<FolderService>,
}

/// Data for registering an uploaded file.
///
/// The bytes have already been written to the blob store under
/// `storage_key` by the caller; this registers the metadata row.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterUploadRequest {
    /// File name (including extension).
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Destination folder. `None` lands the file in the family Inbox,
    /// bootstrapping it when needed.
    pub folder_id: Option<FolderId>,
    /// MIME type, when known.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Opaque blob store key the bytes were written under.
    #[validate(length(min = 1))]
    pub storage_key: String,
    /// SHA-256 checksum of the content, when known.
    pub checksum_sha256: Option<String>,
}

/// Data for moving a file to a different folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFileRequest {
    /// Target folder ID.
    pub target_folder_id: FolderId,
}

impl FileService {
    /// Creates a new file service.
    pub fn new(
        files: Arc<dyn FileStore>,
        folders: Arc<dyn FolderStore>,
        blobs: Arc<dyn BlobStore>,
        resolver: Arc<PermissionResolver>,
        folder_service: Arc<FolderService>,
    ) -> Self {
        Self {
            files,
            folders,
            blobs,
            resolver,
            folder_service,
        }
    }

    /// Registers an uploaded file, enforcing Edit on the destination
    /// folder. Without an explicit destination the file lands in the
    /// family Inbox, where the organization rules pick it up.
    pub async fn register_upload(
        &self,
        ctx: &RequestContext,
        req: RegisterUploadRequest,
    ) -> Result<StoredFile, AppError> {
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        if req.name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if req.size_bytes < 0 {
            return Err(AppError::validation("File size cannot be negative"));
        }

        let destination = match req.folder_id {
            Some(folder_id) => {
                let folder = self
                    .folders
                    .find_by_id(folder_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Destination folder not found"))?;
                if folder.family_id != ctx.family_id {
                    return Err(AppError::forbidden(
                        "Destination folder belongs to another family",
                    ));
                }
                folder
            }
            None => self.folder_service.get_or_create_inbox(ctx).await?,
        };

        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(destination.id),
                PermissionLevel::Edit,
                ctx.family_id,
            )
            .await?;

        let now = Utc::now();
        let file = StoredFile {
            id: FileId::new(),
            family_id: ctx.family_id,
            folder_id: destination.id,
            name: req.name,
            mime_type: req.mime_type,
            size_bytes: req.size_bytes,
            storage_key: req.storage_key,
            checksum_sha256: req.checksum_sha256,
            uploaded_by: ctx.member_id,
            created_at: now,
            updated_at: now,
        };
        self.files.insert(&file).await?;

        info!(
            member_id = %ctx.member_id,
            file_id = %file.id,
            folder_id = %file.folder_id,
            "File registered"
        );

        Ok(file)
    }

    /// Moves a file to a different folder, enforcing Edit on both the
    /// file and the target folder.
    pub async fn move_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        req: MoveFileRequest,
    ) -> Result<StoredFile, AppError> {
        let file = self
            .get_file_with_permission(ctx, file_id, PermissionLevel::Edit)
            .await?;

        let target = self
            .folders
            .find_by_id(req.target_folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Target folder not found"))?;
        if target.family_id != ctx.family_id {
            return Err(AppError::forbidden(
                "Target folder belongs to another family",
            ));
        }

        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(target.id),
                PermissionLevel::Edit,
                ctx.family_id,
            )
            .await?;

        let moved = self.files.update_folder(file_id, target.id).await?;

        info!(
            member_id = %ctx.member_id,
            file_id = %file_id,
            from_folder = %file.folder_id,
            to_folder = %target.id,
            "File moved"
        );

        Ok(moved)
    }

    /// Renames a file, enforcing Edit permission.
    pub async fn rename_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        new_name: &str,
    ) -> Result<StoredFile, AppError> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if new_name.chars().count() > 255 {
            return Err(AppError::validation(
                "File name must be at most 255 characters",
            ));
        }

        self.get_file_with_permission(ctx, file_id, PermissionLevel::Edit)
            .await?;

        let file = self.files.rename(file_id, new_name).await?;

        info!(
            member_id = %ctx.member_id,
            file_id = %file_id,
            new_name = %new_name,
            "File renamed"
        );

        Ok(file)
    }

    /// Deletes a file, enforcing Manage permission. The blob delete is
    /// best-effort; the metadata row and its grants and tag/album
    /// associations are removed atomically.
    pub async fn delete_file(&self, ctx: &RequestContext, file_id: FileId) -> Result<(), AppError> {
        let file = self
            .get_file_with_permission(ctx, file_id, PermissionLevel::Manage)
            .await?;

        if let Err(e) = self.blobs.delete(&file.storage_key).await {
            warn!(
                file_id = %file_id,
                storage_key = %file.storage_key,
                error = %e,
                "Blob delete failed during file delete"
            );
        }

        self.files.remove(file_id).await?;

        info!(member_id = %ctx.member_id, file_id = %file_id, "File deleted");

        Ok(())
    }

    /// Gets a single file's metadata, enforcing View permission.
    pub async fn get_file(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
    ) -> Result<StoredFile, AppError> {
        self.get_file_with_permission(ctx, file_id, PermissionLevel::View)
            .await
    }

    /// Lists the files in a folder, enforcing View on the folder.
    pub async fn list_folder_files(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<Vec<StoredFile>, AppError> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if folder.family_id != ctx.family_id {
            return Err(AppError::forbidden("Folder belongs to another family"));
        }

        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(folder_id),
                PermissionLevel::View,
                ctx.family_id,
            )
            .await?;

        self.files.list_by_folder(folder_id).await
    }

    async fn get_file_with_permission(
        &self,
        ctx: &RequestContext,
        file_id: FileId,
        required: PermissionLevel,
    ) -> Result<StoredFile, AppError> {
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
                required,
                ctx.family_id,
            )
            .await?;

        Ok(file)
    }
}
