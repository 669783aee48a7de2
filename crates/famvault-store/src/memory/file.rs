//! In-memory file store.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;

use famvault_core::error::AppError;
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, FolderId};
use famvault_entity::file::StoredFile;
use famvault_entity::folder::FolderKind;
use famvault_entity::permission::ResourceType;

use crate::traits::FileStore;

use super::db::MemoryDb;

/// File metadata store over the shared in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryFileStore {
    db: MemoryDb,
}

impl MemoryFileStore {
    /// Create a new file store over the given database.
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

fn sorted_by_age(mut files: Vec<StoredFile>) -> Vec<StoredFile> {
    files.sort_by(|a, b| {
        a.created_at
            .cmp(&b.created_at)
            .then_with(|| a.name.cmp(&b.name))
    });
    files
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn insert(&self, file: &StoredFile) -> AppResult<()> {
        let mut state = self.db.write().await;
        state.files.insert(file.id, file.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: FileId) -> AppResult<Option<StoredFile>> {
        let state = self.db.read().await;
        Ok(state.files.get(&id).cloned())
    }

    async fn list_by_folder(&self, folder_id: FolderId) -> AppResult<Vec<StoredFile>> {
        let state = self.db.read().await;
        let files = state
            .files
            .values()
            .filter(|f| f.folder_id == folder_id)
            .cloned()
            .collect();
        Ok(sorted_by_age(files))
    }

    async fn list_by_folders(&self, folder_ids: &[FolderId]) -> AppResult<Vec<StoredFile>> {
        let set: HashSet<FolderId> = folder_ids.iter().copied().collect();
        let state = self.db.read().await;
        let files = state
            .files
            .values()
            .filter(|f| set.contains(&f.folder_id))
            .cloned()
            .collect();
        Ok(sorted_by_age(files))
    }

    async fn update_folder(&self, id: FileId, folder_id: FolderId) -> AppResult<StoredFile> {
        let mut state = self.db.write().await;
        let file = state
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        file.folder_id = folder_id;
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn rename(&self, id: FileId, new_name: &str) -> AppResult<StoredFile> {
        let mut state = self.db.write().await;
        let file = state
            .files
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("File {id} not found")))?;
        file.name = new_name.to_string();
        file.updated_at = Utc::now();
        Ok(file.clone())
    }

    async fn remove(&self, id: FileId) -> AppResult<bool> {
        let mut state = self.db.write().await;

        state
            .grants
            .retain(|(rtype, rid, _), _| *rtype != ResourceType::File || *rid != id.into_uuid());
        state.file_tags.retain(|(fid, _), _| *fid != id);
        state.album_files.retain(|(_, fid), _| *fid != id);
        for album in state.albums.values_mut() {
            if album.cover_file_id == Some(id) {
                album.cover_file_id = None;
                album.updated_at = Utc::now();
            }
        }

        Ok(state.files.remove(&id).is_some())
    }

    async fn list_families_with_inbox_files(&self) -> AppResult<Vec<FamilyId>> {
        let state = self.db.read().await;
        let inboxes: HashSet<FolderId> = state
            .folders
            .values()
            .filter(|f| f.kind == FolderKind::Inbox)
            .map(|f| f.id)
            .collect();
        let families: HashSet<FamilyId> = state
            .files
            .values()
            .filter(|f| inboxes.contains(&f.folder_id))
            .map(|f| f.family_id)
            .collect();
        Ok(families.into_iter().collect())
    }
}
