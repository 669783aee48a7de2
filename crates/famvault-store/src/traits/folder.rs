//! Folder store trait.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, FolderId};
use famvault_entity::folder::Folder;

/// Persistence operations for the folder tree.
#[async_trait]
pub trait FolderStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a fully-populated folder row.
    async fn insert(&self, folder: &Folder) -> AppResult<()>;

    /// Find a folder by ID.
    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>>;

    /// Find the family's Root folder, if it has been bootstrapped.
    async fn find_root(&self, family_id: FamilyId) -> AppResult<Option<Folder>>;

    /// Find the family's Inbox folder, if it has been bootstrapped.
    async fn find_inbox(&self, family_id: FamilyId) -> AppResult<Option<Folder>>;

    /// List direct children of a folder, ordered by name.
    async fn list_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>>;

    /// List every folder of a family, ordered by path.
    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Folder>>;

    /// List every folder of a family whose path starts with the given
    /// prefix. This is the transitive-descendant query: the prefix is the
    /// ancestor's `child_path()`.
    async fn list_descendants(
        &self,
        family_id: FamilyId,
        path_prefix: &str,
    ) -> AppResult<Vec<Folder>>;

    /// Update a folder's name only. Paths are id-based, so no cascade.
    async fn rename(&self, id: FolderId, new_name: &str) -> AppResult<Folder>;

    /// Re-parent a folder and rewrite the paths of its whole subtree.
    ///
    /// `old_prefix`/`new_prefix` are the folder's `child_path()` before and
    /// after the move; every descendant path carrying the old prefix is
    /// rewritten to the new one. The folder row update and the descendant
    /// rewrite are applied atomically from one snapshot.
    async fn move_subtree(
        &self,
        id: FolderId,
        new_parent_id: FolderId,
        new_path: &str,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<Folder>;

    /// Remove a folder subtree and everything hanging off it in one
    /// atomic batch: the listed folders and files, their permission
    /// grants, file/tag associations, and album memberships. Album covers
    /// pointing at removed files are cleared.
    async fn remove_subtree(
        &self,
        family_id: FamilyId,
        folder_ids: &[FolderId],
        file_ids: &[FileId],
    ) -> AppResult<()>;
}
