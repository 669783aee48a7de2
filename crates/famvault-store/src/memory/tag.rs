//! In-memory tag store.

use std::collections::hash_map::Entry;
use std::collections::HashSet;

use async_trait::async_trait;
use chrono::Utc;

use famvault_core::error::AppError;
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, TagId};
use famvault_entity::tag::{FileTag, Tag};

use crate::traits::TagStore;

use super::db::MemoryDb;

/// Tag store over the shared in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryTagStore {
    db: MemoryDb,
}

impl MemoryTagStore {
    /// Create a new tag store over the given database.
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagStore for MemoryTagStore {
    async fn insert(&self, tag: &Tag) -> AppResult<()> {
        let mut state = self.db.write().await;
        let taken = state.tags.values().any(|t| {
            t.family_id == tag.family_id && t.name.eq_ignore_ascii_case(&tag.name)
        });
        if taken {
            return Err(AppError::conflict(format!("Tag '{}' already exists", tag.name)));
        }
        state.tags.insert(tag.id, tag.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: TagId) -> AppResult<Option<Tag>> {
        let state = self.db.read().await;
        Ok(state.tags.get(&id).cloned())
    }

    async fn find_by_name(&self, family_id: FamilyId, name: &str) -> AppResult<Option<Tag>> {
        let state = self.db.read().await;
        Ok(state
            .tags
            .values()
            .find(|t| t.family_id == family_id && t.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Tag>> {
        let state = self.db.read().await;
        let mut tags: Vec<Tag> = state
            .tags
            .values()
            .filter(|t| t.family_id == family_id)
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn list_by_ids(&self, ids: &[TagId]) -> AppResult<Vec<Tag>> {
        let set: HashSet<TagId> = ids.iter().copied().collect();
        let state = self.db.read().await;
        let mut tags: Vec<Tag> = state
            .tags
            .values()
            .filter(|t| set.contains(&t.id))
            .cloned()
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn rename(&self, id: TagId, new_name: &str) -> AppResult<Tag> {
        let mut state = self.db.write().await;
        let family_id = state
            .tags
            .get(&id)
            .ok_or_else(|| AppError::not_found(format!("Tag {id} not found")))?
            .family_id;
        let taken = state.tags.values().any(|t| {
            t.id != id && t.family_id == family_id && t.name.eq_ignore_ascii_case(new_name)
        });
        if taken {
            return Err(AppError::conflict(format!("Tag '{new_name}' already exists")));
        }
        let tag = state
            .tags
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Tag {id} not found")))?;
        tag.name = new_name.to_string();
        Ok(tag.clone())
    }

    async fn remove(&self, id: TagId) -> AppResult<bool> {
        let mut state = self.db.write().await;
        state.file_tags.retain(|(_, tid), _| *tid != id);
        Ok(state.tags.remove(&id).is_some())
    }

    async fn attach(&self, file_id: FileId, tag_id: TagId) -> AppResult<bool> {
        let mut state = self.db.write().await;
        match state.file_tags.entry((file_id, tag_id)) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(FileTag {
                    file_id,
                    tag_id,
                    created_at: Utc::now(),
                });
                Ok(true)
            }
        }
    }

    async fn detach(&self, file_id: FileId, tag_id: TagId) -> AppResult<bool> {
        let mut state = self.db.write().await;
        Ok(state.file_tags.remove(&(file_id, tag_id)).is_some())
    }

    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<Tag>> {
        let state = self.db.read().await;
        let mut tags: Vec<Tag> = state
            .file_tags
            .keys()
            .filter(|(fid, _)| *fid == file_id)
            .filter_map(|(_, tid)| state.tags.get(tid).cloned())
            .collect();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}
