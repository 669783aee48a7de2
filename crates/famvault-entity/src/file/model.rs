//! Stored file entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use famvault_core::types::{FamilyId, FileId, FolderId, MemberId};

/// A file stored in FamVault.
///
/// The bytes live behind the blob store under `storage_key`; this row is
/// the metadata the hierarchy, permission, and rule components operate on.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredFile {
    /// Unique file identifier.
    pub id: FileId,
    /// The family that owns this file.
    pub family_id: FamilyId,
    /// The folder containing this file. A file always belongs to exactly
    /// one existing folder in the same family.
    pub folder_id: FolderId,
    /// The file name (including extension).
    pub name: String,
    /// MIME type of the file.
    pub mime_type: Option<String>,
    /// File size in bytes.
    pub size_bytes: i64,
    /// Opaque reference to the bytes in the blob store.
    pub storage_key: String,
    /// SHA-256 checksum of the file content.
    pub checksum_sha256: Option<String>,
    /// The member who uploaded the file.
    pub uploaded_by: MemberId,
    /// When the file was created.
    pub created_at: DateTime<Utc>,
    /// When the file was last updated.
    pub updated_at: DateTime<Utc>,
}

impl StoredFile {
    /// Get the file extension (lowercase), if any.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit('.')
            .next()
            .filter(|ext| *ext != self.name)
            .map(|ext| ext.to_lowercase())
    }
}
