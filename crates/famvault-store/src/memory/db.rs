//! Shared in-memory state for the memory store backend.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

use famvault_core::types::{AlbumId, FamilyId, FileId, FolderId, MemberId, RuleId, TagId};
use famvault_entity::album::{Album, AlbumFile};
use famvault_entity::file::StoredFile;
use famvault_entity::folder::Folder;
use famvault_entity::member::FamilyMember;
use famvault_entity::permission::{PermissionGrant, ResourceType};
use famvault_entity::processing::ProcessingLogEntry;
use famvault_entity::rule::OrganizationRule;
use famvault_entity::tag::{FileTag, Tag};

/// All tables of the memory backend.
///
/// Every memory store holds a clone of the same [`MemoryDb`], so a
/// multi-table cascade is a single write-lock acquisition and observers
/// never see a half-applied delete.
#[derive(Debug, Default)]
pub(crate) struct MemoryState {
    pub(crate) folders: HashMap<FolderId, Folder>,
    pub(crate) files: HashMap<FileId, StoredFile>,
    /// Grants keyed by the unique (resource type, resource id, member) tuple.
    pub(crate) grants: HashMap<(ResourceType, Uuid, MemberId), PermissionGrant>,
    pub(crate) rules: HashMap<RuleId, OrganizationRule>,
    pub(crate) tags: HashMap<TagId, Tag>,
    pub(crate) file_tags: HashMap<(FileId, TagId), FileTag>,
    pub(crate) albums: HashMap<AlbumId, Album>,
    pub(crate) album_files: HashMap<(AlbumId, FileId), AlbumFile>,
    /// Append-only; insertion order is the chronology.
    pub(crate) log_entries: Vec<ProcessingLogEntry>,
    pub(crate) members: HashMap<(MemberId, FamilyId), FamilyMember>,
}

/// Handle to the shared in-memory database.
#[derive(Debug, Clone, Default)]
pub struct MemoryDb {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryDb {
    /// Create an empty in-memory database.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) async fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().await
    }

    pub(crate) async fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().await
    }
}
