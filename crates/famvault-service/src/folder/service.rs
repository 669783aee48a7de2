//! Folder tree operations: bootstrap, structural mutations, reads.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use famvault_core::error::AppError;
use famvault_core::traits::storage::BlobStore;
use famvault_core::types::{FamilyId, FileId, FolderId};
use famvault_entity::folder::{path, Folder, FolderKind, FolderTree};
use famvault_entity::permission::{PermissionLevel, ResourceRef};
use famvault_policy::PermissionResolver;
use famvault_store::{FileStore, FolderStore};

use crate::context::RequestContext;
use crate::folder::locks::FamilyLocks;

/// Name given to the lazily-bootstrapped Root folder.
const ROOT_FOLDER_NAME: &str = "Root";
/// Name given to the lazily-bootstrapped Inbox folder.
const INBOX_FOLDER_NAME: &str = "Inbox";

/// Manages the folder tree with per-family serialization of structural
/// mutations.
#[derive(Debug, Clone)]
pub struct FolderService {
    /// Folder store.
    folders: Arc<dyn FolderStore>,
    /// File store (cascade collection).
    files: Arc<dyn FileStore>,
    /// Blob store (best-effort content deletion during cascade).
    blobs: Arc<dyn BlobStore>,
    /// Permission resolver.
    resolver: Arc<PermissionResolver>,
    /// Per-family mutation locks.
    locks: Arc<FamilyLocks>,
}

/// Data for creating a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Folder name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// Parent folder ID. `None` creates under the family Root,
    /// bootstrapping the Root first when it does not exist yet.
    pub parent_id: Option<FolderId>,
}

/// Data for moving a folder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveFolderRequest {
    /// New parent folder ID.
    pub new_parent_id: FolderId,
}

/// Counts reported by a cascading folder delete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CascadeSummary {
    /// Folders removed, including the deleted folder itself.
    pub folders_removed: u64,
    /// Files removed across the whole subtree.
    pub files_removed: u64,
}

impl FolderService {
    /// Creates a new folder service.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        blobs: Arc<dyn BlobStore>,
        resolver: Arc<PermissionResolver>,
        locks: Arc<FamilyLocks>,
    ) -> Self {
        Self {
            folders,
            files,
            blobs,
            resolver,
            locks,
        }
    }

    /// Creates a folder.
    ///
    /// With no parent the folder lands under the family Root, which is
    /// bootstrapped on first use; repeated parentless calls reuse the
    /// existing Root. An explicit parent must exist and belong to the
    /// caller's family, and the caller needs Edit on it.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> Result<Folder, AppError> {
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        let _guard = self.locks.lock_family(ctx.family_id).await;

        let parent = match req.parent_id {
            Some(parent_id) => {
                let parent = self
                    .folders
                    .find_by_id(parent_id)
                    .await?
                    .ok_or_else(|| AppError::not_found("Parent folder not found"))?;
                if parent.family_id != ctx.family_id {
                    return Err(AppError::forbidden(
                        "Parent folder belongs to another family",
                    ));
                }
                parent
            }
            None => self.ensure_root(ctx).await?,
        };

        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(parent.id),
                PermissionLevel::Edit,
                ctx.family_id,
            )
            .await?;

        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(),
            family_id: ctx.family_id,
            parent_id: Some(parent.id),
            name: req.name,
            path: parent.child_path(),
            kind: FolderKind::Regular,
            created_by: ctx.member_id,
            created_at: now,
            updated_at: now,
        };
        self.folders.insert(&folder).await?;

        info!(
            member_id = %ctx.member_id,
            folder_id = %folder.id,
            path = %folder.path,
            "Folder created"
        );

        Ok(folder)
    }

    /// Renames a folder. Paths are id-based, so no descendant cascade.
    pub async fn rename_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        new_name: &str,
    ) -> Result<Folder, AppError> {
        if new_name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if new_name.chars().count() > 255 {
            return Err(AppError::validation(
                "Folder name must be at most 255 characters",
            ));
        }

        let _guard = self.locks.lock_family(ctx.family_id).await;

        let folder = self.load_folder(ctx, folder_id).await?;
        if folder.is_system() {
            return Err(AppError::forbidden(
                "The Root and Inbox folders cannot be renamed",
            ));
        }

        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(folder_id),
                PermissionLevel::Edit,
                ctx.family_id,
            )
            .await?;

        let folder = self.folders.rename(folder_id, new_name).await?;

        info!(
            member_id = %ctx.member_id,
            folder_id = %folder_id,
            new_name = %new_name,
            "Folder renamed"
        );

        Ok(folder)
    }

    /// Moves a folder under a new parent, rewriting every descendant path
    /// from one snapshot in a single store call.
    pub async fn move_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        req: MoveFolderRequest,
    ) -> Result<Folder, AppError> {
        let _guard = self.locks.lock_family(ctx.family_id).await;

        let folder = self.load_folder(ctx, folder_id).await?;
        if folder.is_system() {
            return Err(AppError::forbidden(
                "The Root and Inbox folders cannot be moved",
            ));
        }
        if req.new_parent_id == folder_id {
            return Err(AppError::forbidden("Cannot move a folder into itself"));
        }

        let target = self
            .folders
            .find_by_id(req.new_parent_id)
            .await?
            .ok_or_else(|| AppError::not_found("Target folder not found"))?;
        if target.family_id != ctx.family_id {
            return Err(AppError::forbidden(
                "Target folder belongs to another family",
            ));
        }
        if path::is_descendant_path(&target.path, &folder.path, folder.id) {
            return Err(AppError::forbidden(
                "Cannot move a folder into one of its descendants",
            ));
        }

        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(folder_id),
                PermissionLevel::Edit,
                ctx.family_id,
            )
            .await?;
        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(target.id),
                PermissionLevel::Edit,
                ctx.family_id,
            )
            .await?;

        let new_path = target.child_path();
        let old_prefix = folder.child_path();
        let new_prefix = path::child_prefix(&new_path, folder.id);

        let moved = self
            .folders
            .move_subtree(folder_id, target.id, &new_path, &old_prefix, &new_prefix)
            .await?;

        info!(
            member_id = %ctx.member_id,
            folder_id = %folder_id,
            new_parent = %target.id,
            "Folder moved"
        );

        Ok(moved)
    }

    /// Deletes a folder and everything below it: descendant folders, the
    /// files they contain, and the grants and tag/album associations
    /// hanging off them.
    ///
    /// Blob deletes run first and are best-effort; the metadata cascade is
    /// applied atomically afterwards.
    pub async fn delete_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<CascadeSummary, AppError> {
        let _guard = self.locks.lock_family(ctx.family_id).await;

        let folder = self.load_folder(ctx, folder_id).await?;
        if folder.is_system() {
            return Err(AppError::forbidden(
                "The Root and Inbox folders cannot be deleted",
            ));
        }

        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(folder_id),
                PermissionLevel::Manage,
                ctx.family_id,
            )
            .await?;

        // One snapshot of the subtree, then one atomic cascade.
        let descendants = self
            .folders
            .list_descendants(ctx.family_id, &folder.child_path())
            .await?;
        let mut folder_ids: Vec<FolderId> = Vec::with_capacity(descendants.len() + 1);
        folder_ids.push(folder.id);
        folder_ids.extend(descendants.iter().map(|f| f.id));

        let files = self.files.list_by_folders(&folder_ids).await?;
        for file in &files {
            if let Err(e) = self.blobs.delete(&file.storage_key).await {
                warn!(
                    file_id = %file.id,
                    storage_key = %file.storage_key,
                    error = %e,
                    "Blob delete failed during folder cascade"
                );
            }
        }

        let file_ids: Vec<FileId> = files.iter().map(|f| f.id).collect();
        self.folders
            .remove_subtree(ctx.family_id, &folder_ids, &file_ids)
            .await?;

        let summary = CascadeSummary {
            folders_removed: folder_ids.len() as u64,
            files_removed: file_ids.len() as u64,
        };

        info!(
            member_id = %ctx.member_id,
            folder_id = %folder_id,
            folders_removed = summary.folders_removed,
            files_removed = summary.files_removed,
            "Folder deleted"
        );

        Ok(summary)
    }

    /// Returns the family's Inbox, creating it under the Root on first
    /// use. Upload registration lands files here by default.
    pub async fn get_or_create_inbox(&self, ctx: &RequestContext) -> Result<Folder, AppError> {
        if let Some(inbox) = self.folders.find_inbox(ctx.family_id).await? {
            return Ok(inbox);
        }

        let _guard = self.locks.lock_family(ctx.family_id).await;
        // Re-check under the lock; a concurrent request may have won.
        if let Some(inbox) = self.folders.find_inbox(ctx.family_id).await? {
            return Ok(inbox);
        }

        let root = self.ensure_root(ctx).await?;
        let now = Utc::now();
        let inbox = Folder {
            id: FolderId::new(),
            family_id: ctx.family_id,
            parent_id: Some(root.id),
            name: INBOX_FOLDER_NAME.to_string(),
            path: root.child_path(),
            kind: FolderKind::Inbox,
            created_by: ctx.member_id,
            created_at: now,
            updated_at: now,
        };
        self.folders.insert(&inbox).await?;

        info!(
            family_id = %ctx.family_id,
            folder_id = %inbox.id,
            "Inbox folder bootstrapped"
        );

        Ok(inbox)
    }

    /// The family's Inbox folder, if it has been bootstrapped.
    pub async fn find_inbox(&self, family_id: FamilyId) -> Result<Option<Folder>, AppError> {
        self.folders.find_inbox(family_id).await
    }

    /// Gets a folder, enforcing View permission.
    pub async fn get_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<Folder, AppError> {
        let folder = self.load_folder(ctx, folder_id).await?;
        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(folder_id),
                PermissionLevel::View,
                ctx.family_id,
            )
            .await?;
        Ok(folder)
    }

    /// Lists a folder's direct children, enforcing View permission on the
    /// parent.
    pub async fn list_children(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<Vec<Folder>, AppError> {
        self.get_folder(ctx, folder_id).await?;
        self.folders.list_children(folder_id).await
    }

    /// The family's whole folder tree. Empty before the Root has been
    /// bootstrapped.
    pub async fn folder_tree(&self, ctx: &RequestContext) -> Result<FolderTree, AppError> {
        let Some(root) = self.folders.find_root(ctx.family_id).await? else {
            return Ok(FolderTree::empty());
        };
        self.resolver
            .require(
                ctx.member_id,
                ResourceRef::Folder(root.id),
                PermissionLevel::View,
                ctx.family_id,
            )
            .await?;

        let folders = self.folders.list_by_family(ctx.family_id).await?;
        Ok(FolderTree::from_folders(folders))
    }

    /// Loads the family Root, creating it when absent. Callers hold the
    /// family lock.
    async fn ensure_root(&self, ctx: &RequestContext) -> Result<Folder, AppError> {
        if let Some(root) = self.folders.find_root(ctx.family_id).await? {
            return Ok(root);
        }

        let now = Utc::now();
        let root = Folder {
            id: FolderId::new(),
            family_id: ctx.family_id,
            parent_id: None,
            name: ROOT_FOLDER_NAME.to_string(),
            path: path::ROOT_PATH.to_string(),
            kind: FolderKind::Root,
            created_by: ctx.member_id,
            created_at: now,
            updated_at: now,
        };
        self.folders.insert(&root).await?;

        info!(
            family_id = %ctx.family_id,
            folder_id = %root.id,
            "Root folder bootstrapped"
        );

        Ok(root)
    }

    async fn load_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> Result<Folder, AppError> {
        let folder = self
            .folders
            .find_by_id(folder_id)
            .await?
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if folder.family_id != ctx.family_id {
            return Err(AppError::forbidden("Folder belongs to another family"));
        }
        Ok(folder)
    }
}
