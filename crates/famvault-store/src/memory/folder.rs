//! In-memory folder store.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;

use famvault_core::error::AppError;
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, FolderId};
use famvault_entity::folder::{Folder, FolderKind};
use famvault_entity::permission::ResourceType;

use crate::traits::FolderStore;

use super::db::MemoryDb;

/// Folder store over the shared in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryFolderStore {
    db: MemoryDb,
}

impl MemoryFolderStore {
    /// Create a new folder store over the given database.
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FolderStore for MemoryFolderStore {
    async fn insert(&self, folder: &Folder) -> AppResult<()> {
        let mut state = self.db.write().await;
        state.folders.insert(folder.id, folder.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: FolderId) -> AppResult<Option<Folder>> {
        let state = self.db.read().await;
        Ok(state.folders.get(&id).cloned())
    }

    async fn find_root(&self, family_id: FamilyId) -> AppResult<Option<Folder>> {
        let state = self.db.read().await;
        Ok(state
            .folders
            .values()
            .find(|f| f.family_id == family_id && f.kind == FolderKind::Root)
            .cloned())
    }

    async fn find_inbox(&self, family_id: FamilyId) -> AppResult<Option<Folder>> {
        let state = self.db.read().await;
        Ok(state
            .folders
            .values()
            .find(|f| f.family_id == family_id && f.kind == FolderKind::Inbox)
            .cloned())
    }

    async fn list_children(&self, parent_id: FolderId) -> AppResult<Vec<Folder>> {
        let state = self.db.read().await;
        let mut children: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Folder>> {
        let state = self.db.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.family_id == family_id)
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.name.cmp(&b.name)));
        Ok(folders)
    }

    async fn list_descendants(
        &self,
        family_id: FamilyId,
        path_prefix: &str,
    ) -> AppResult<Vec<Folder>> {
        let state = self.db.read().await;
        let mut folders: Vec<Folder> = state
            .folders
            .values()
            .filter(|f| f.family_id == family_id && f.path.starts_with(path_prefix))
            .cloned()
            .collect();
        folders.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.name.cmp(&b.name)));
        Ok(folders)
    }

    async fn rename(&self, id: FolderId, new_name: &str) -> AppResult<Folder> {
        let mut state = self.db.write().await;
        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.name = new_name.to_string();
        folder.updated_at = Utc::now();
        Ok(folder.clone())
    }

    async fn move_subtree(
        &self,
        id: FolderId,
        new_parent_id: FolderId,
        new_path: &str,
        old_prefix: &str,
        new_prefix: &str,
    ) -> AppResult<Folder> {
        let mut state = self.db.write().await;

        let folder = state
            .folders
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Folder {id} not found")))?;
        folder.parent_id = Some(new_parent_id);
        folder.path = new_path.to_string();
        folder.updated_at = Utc::now();
        let moved = folder.clone();

        // Rewrite every descendant path under the same lock, so readers
        // never observe a subtree that is half old-prefix, half new.
        for f in state.folders.values_mut() {
            if f.family_id != moved.family_id || f.id == id {
                continue;
            }
            if let Some(rest) = f.path.strip_prefix(old_prefix) {
                f.path = format!("{new_prefix}{rest}");
                f.updated_at = Utc::now();
            }
        }

        Ok(moved)
    }

    async fn remove_subtree(
        &self,
        family_id: FamilyId,
        folder_ids: &[FolderId],
        file_ids: &[FileId],
    ) -> AppResult<()> {
        let folder_set: HashSet<FolderId> = folder_ids.iter().copied().collect();
        let file_set: HashSet<FileId> = file_ids.iter().copied().collect();

        let mut state = self.db.write().await;

        state.grants.retain(|(rtype, rid, _), _| match rtype {
            ResourceType::Folder => !folder_set.contains(&FolderId::from_uuid(*rid)),
            ResourceType::File => !file_set.contains(&FileId::from_uuid(*rid)),
        });
        state.file_tags.retain(|(fid, _), _| !file_set.contains(fid));
        state.album_files.retain(|(_, fid), _| !file_set.contains(fid));
        for album in state.albums.values_mut() {
            if album.cover_file_id.is_some_and(|c| file_set.contains(&c)) {
                album.cover_file_id = None;
                album.updated_at = Utc::now();
            }
        }
        state.files.retain(|fid, _| !file_set.contains(fid));
        state
            .folders
            .retain(|fid, f| f.family_id != family_id || !folder_set.contains(fid));

        Ok(())
    }
}
