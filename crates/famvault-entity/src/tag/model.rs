//! Tag entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use famvault_core::types::{FamilyId, FileId, MemberId, TagId};

/// A label files can carry.
///
/// Tag names are unique per family, case-insensitive; creating or renaming
/// to a taken name is a conflict.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Tag {
    /// Unique tag identifier.
    pub id: TagId,
    /// The family this tag belongs to.
    pub family_id: FamilyId,
    /// Tag name.
    pub name: String,
    /// Optional display color (e.g., `"#ff8800"`).
    pub color: Option<String>,
    /// The member who created the tag.
    pub created_by: MemberId,
    /// When the tag was created.
    pub created_at: DateTime<Utc>,
}

/// A file/tag association. Unique per (file, tag); tagging is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileTag {
    /// The tagged file.
    pub file_id: FileId,
    /// The applied tag.
    pub tag_id: TagId,
    /// When the association was created.
    pub created_at: DateTime<Utc>,
}
