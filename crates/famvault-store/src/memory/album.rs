//! In-memory album store.

use std::collections::hash_map::Entry;

use async_trait::async_trait;
use chrono::Utc;

use famvault_core::error::AppError;
use famvault_core::result::AppResult;
use famvault_core::types::{AlbumId, FamilyId, FileId};
use famvault_entity::album::{Album, AlbumFile};
use famvault_entity::file::StoredFile;

use crate::traits::AlbumStore;

use super::db::MemoryDb;

/// Album store over the shared in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryAlbumStore {
    db: MemoryDb,
}

impl MemoryAlbumStore {
    /// Create a new album store over the given database.
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AlbumStore for MemoryAlbumStore {
    async fn insert(&self, album: &Album) -> AppResult<()> {
        let mut state = self.db.write().await;
        state.albums.insert(album.id, album.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: AlbumId) -> AppResult<Option<Album>> {
        let state = self.db.read().await;
        Ok(state.albums.get(&id).cloned())
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Album>> {
        let state = self.db.read().await;
        let mut albums: Vec<Album> = state
            .albums
            .values()
            .filter(|a| a.family_id == family_id)
            .cloned()
            .collect();
        albums.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(albums)
    }

    async fn rename(&self, id: AlbumId, new_name: &str) -> AppResult<Album> {
        let mut state = self.db.write().await;
        let album = state
            .albums
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Album {id} not found")))?;
        album.name = new_name.to_string();
        album.updated_at = Utc::now();
        Ok(album.clone())
    }

    async fn remove(&self, id: AlbumId) -> AppResult<bool> {
        let mut state = self.db.write().await;
        state.album_files.retain(|(aid, _), _| *aid != id);
        Ok(state.albums.remove(&id).is_some())
    }

    async fn add_file(&self, album_id: AlbumId, file_id: FileId) -> AppResult<bool> {
        let mut state = self.db.write().await;
        match state.album_files.entry((album_id, file_id)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(AlbumFile {
                    album_id,
                    file_id,
                    added_at: Utc::now(),
                });
                Ok(true)
            }
        }
    }

    async fn remove_file(&self, album_id: AlbumId, file_id: FileId) -> AppResult<bool> {
        let mut state = self.db.write().await;
        Ok(state.album_files.remove(&(album_id, file_id)).is_some())
    }

    async fn set_cover(&self, id: AlbumId, cover: Option<FileId>) -> AppResult<Album> {
        let mut state = self.db.write().await;
        let album = state
            .albums
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Album {id} not found")))?;
        album.cover_file_id = cover;
        album.updated_at = Utc::now();
        Ok(album.clone())
    }

    async fn list_files(&self, album_id: AlbumId) -> AppResult<Vec<StoredFile>> {
        let state = self.db.read().await;
        let mut entries: Vec<&AlbumFile> = state
            .album_files
            .values()
            .filter(|af| af.album_id == album_id)
            .collect();
        entries.sort_by(|a, b| a.added_at.cmp(&b.added_at));
        Ok(entries
            .into_iter()
            .filter_map(|af| state.files.get(&af.file_id).cloned())
            .collect())
    }
}
