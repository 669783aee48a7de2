//! Album store trait.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{AlbumId, FamilyId, FileId};
use famvault_entity::album::Album;
use famvault_entity::file::StoredFile;

/// Persistence operations for albums and album/file associations.
#[async_trait]
pub trait AlbumStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a fully-populated album row.
    async fn insert(&self, album: &Album) -> AppResult<()>;

    /// Find an album by ID.
    async fn find_by_id(&self, id: AlbumId) -> AppResult<Option<Album>>;

    /// List all albums of a family, ordered by name.
    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Album>>;

    /// Rename an album.
    async fn rename(&self, id: AlbumId, new_name: &str) -> AppResult<Album>;

    /// Delete an album and its file associations. Returns `false` when it
    /// was already gone.
    async fn remove(&self, id: AlbumId) -> AppResult<bool>;

    /// Add a file to an album. Idempotent; returns `true` only when the
    /// association was newly created.
    async fn add_file(&self, album_id: AlbumId, file_id: FileId) -> AppResult<bool>;

    /// Remove a file from an album. Idempotent; returns `true` only when
    /// an association was actually removed.
    async fn remove_file(&self, album_id: AlbumId, file_id: FileId) -> AppResult<bool>;

    /// Set or clear the album cover.
    async fn set_cover(&self, id: AlbumId, cover: Option<FileId>) -> AppResult<Album>;

    /// List the files in an album, ordered by when they were added.
    async fn list_files(&self, album_id: AlbumId) -> AppResult<Vec<StoredFile>>;
}
