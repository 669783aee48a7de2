//! Album entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use famvault_core::types::{AlbumId, FamilyId, FileId, MemberId};

/// A curated collection of files.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Album {
    /// Unique album identifier.
    pub id: AlbumId,
    /// The family this album belongs to.
    pub family_id: FamilyId,
    /// Album name.
    pub name: String,
    /// Cover file; auto-set to the first file added while unset, cleared
    /// when that file is removed from the album.
    pub cover_file_id: Option<FileId>,
    /// The member who created the album.
    pub created_by: MemberId,
    /// When the album was created.
    pub created_at: DateTime<Utc>,
    /// When the album was last updated.
    pub updated_at: DateTime<Utc>,
}

/// An album/file association. Unique per (album, file); adding is idempotent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AlbumFile {
    /// The album.
    pub album_id: AlbumId,
    /// The contained file.
    pub file_id: FileId,
    /// When the file was added to the album.
    pub added_at: DateTime<Utc>,
}
