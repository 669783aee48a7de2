//! Permission level enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Permission level granted on a resource.
///
/// Ordered by privilege: Manage > Edit > View. A grant at a higher level
/// always satisfies a lower requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "permission_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    /// Read-only access.
    View,
    /// Can modify content and move it around.
    Edit,
    /// Full control including deletion and grant administration.
    Manage,
}

impl PermissionLevel {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Manage => 3,
            Self::Edit => 2,
            Self::View => 1,
        }
    }

    /// Check if this level grants at least the given required level.
    pub fn has_at_least(&self, required: &PermissionLevel) -> bool {
        self.privilege_level() >= required.privilege_level()
    }

    /// Return the level as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
            Self::Manage => "manage",
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PermissionLevel {
    type Err = famvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            "manage" => Ok(Self::Manage),
            _ => Err(famvault_core::AppError::validation(format!(
                "Invalid permission level: '{s}'. Expected one of: view, edit, manage"
            ))),
        }
    }
}
