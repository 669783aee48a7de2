//! Folder kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distinguishes the two bootstrap folders from ordinary user folders.
///
/// Every family has exactly one `Root` and at most one `Inbox` (created
/// under the Root on demand). Neither may be renamed, moved, or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "folder_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FolderKind {
    /// The single top-level folder of a family; its path is `/`.
    Root,
    /// The landing folder for uploaded files awaiting organization.
    Inbox,
    /// An ordinary user-created folder.
    Regular,
}

impl FolderKind {
    /// Check whether this kind is one of the protected bootstrap folders.
    pub fn is_system(&self) -> bool {
        matches!(self, Self::Root | Self::Inbox)
    }

    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Inbox => "inbox",
            Self::Regular => "regular",
        }
    }
}

impl fmt::Display for FolderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FolderKind {
    type Err = famvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "root" => Ok(Self::Root),
            "inbox" => Ok(Self::Inbox),
            "regular" => Ok(Self::Regular),
            _ => Err(famvault_core::AppError::validation(format!(
                "Invalid folder kind: '{s}'. Expected one of: root, inbox, regular"
            ))),
        }
    }
}
