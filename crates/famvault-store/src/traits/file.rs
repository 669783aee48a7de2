//! File store trait.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, FolderId};
use famvault_entity::file::StoredFile;

/// Persistence operations for stored-file metadata.
#[async_trait]
pub trait FileStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a fully-populated file row.
    async fn insert(&self, file: &StoredFile) -> AppResult<()>;

    /// Find a file by ID.
    async fn find_by_id(&self, id: FileId) -> AppResult<Option<StoredFile>>;

    /// List files in one folder, ordered by name.
    async fn list_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<StoredFile>>;

    /// List files across a set of folders (the subtree collection used by
    /// cascading delete).
    async fn list_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<Vec<StoredFile>>;

    /// Update a file's owning folder (the move operation).
    async fn update_folder(&self, id: FileId, folder_id: FolderId) -> AppResult<StoredFile>;

    /// Update a file's name.
    async fn rename(&self, id: FileId, new_name: &str) -> AppResult<StoredFile>;

    /// Remove one file together with its grants, tag associations, and
    /// album memberships, atomically. Returns `false` when the file was
    /// already gone.
    async fn remove(&self, id: FileId) -> AppResult<bool>;

    /// Families that currently have at least one file in their Inbox.
    /// Drives the periodic sweep.
    async fn list_families_with_inbox_files(&self) -> AppResult<Vec<FamilyId>>;
}
