//! Permission grant entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use famvault_core::types::{FamilyId, FileId, FolderId, GrantId, MemberId};

use super::level::PermissionLevel;

/// Resource type a permission grant applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// A stored file.
    File,
    /// A folder.
    Folder,
}

impl ResourceType {
    /// Return the type as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed reference to a permission-bearing resource.
///
/// The permission resolver dispatches on this tag: files inherit through
/// their folder chain, folders are evaluated against their own grants only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "resource_type", content = "resource_id", rename_all = "lowercase")]
pub enum ResourceRef {
    /// A stored file.
    File(FileId),
    /// A folder.
    Folder(FolderId),
}

impl ResourceRef {
    /// The resource type tag.
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::File(_) => ResourceType::File,
            Self::Folder(_) => ResourceType::Folder,
        }
    }

    /// The untyped resource id, as stored in grant rows.
    pub fn resource_uuid(&self) -> Uuid {
        match self {
            Self::File(id) => id.into_uuid(),
            Self::Folder(id) => id.into_uuid(),
        }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.resource_type(), self.resource_uuid())
    }
}

/// A permission grant for one member on one resource.
///
/// Grants are upserted by the unique (resource type, resource id, member)
/// tuple. A resource with no grants at all is unrestricted: every family
/// member may access it at any level.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PermissionGrant {
    /// Unique grant identifier.
    pub id: GrantId,
    /// The family the resource belongs to.
    pub family_id: FamilyId,
    /// Type of resource this grant applies to.
    pub resource_type: ResourceType,
    /// ID of the resource (a file id or folder id, per `resource_type`).
    pub resource_id: Uuid,
    /// The member granted this permission.
    pub member_id: MemberId,
    /// The granted level.
    pub level: PermissionLevel,
    /// The member who granted this permission.
    pub granted_by: MemberId,
    /// When this grant was created.
    pub created_at: DateTime<Utc>,
    /// When this grant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl PermissionGrant {
    /// The typed resource reference this grant applies to.
    pub fn resource(&self) -> ResourceRef {
        match self.resource_type {
            ResourceType::File => ResourceRef::File(FileId::from_uuid(self.resource_id)),
            ResourceType::Folder => ResourceRef::Folder(FolderId::from_uuid(self.resource_id)),
        }
    }
}
