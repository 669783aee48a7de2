//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use famvault_core::types::{FamilyId, FolderId, MemberId};

use super::kind::FolderKind;
use super::path;

/// A folder in a family's file hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The family that owns this folder.
    pub family_id: FamilyId,
    /// Parent folder ID (None only for the family Root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// Materialized path of ancestor ids (e.g., `/<root-id>/<parent-id>/`).
    pub path: String,
    /// Whether this is the Root, the Inbox, or a regular folder.
    pub kind: FolderKind,
    /// The member who created the folder.
    pub created_by: MemberId,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Folder {
    /// Check if this is a protected bootstrap folder (Root or Inbox).
    pub fn is_system(&self) -> bool {
        self.kind.is_system()
    }

    /// The path every direct child of this folder carries.
    pub fn child_path(&self) -> String {
        path::child_prefix(&self.path, self.id)
    }

    /// Depth in the tree (0 for the Root).
    pub fn depth(&self) -> usize {
        path::depth(&self.path)
    }
}
