//! Family role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Roles a member can hold within a family.
///
/// Roles are ordered by privilege level: Owner > Admin > Member. Admins
/// and the Owner bypass per-resource permission grants entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "family_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FamilyRole {
    /// The family creator; full control.
    Owner,
    /// Can manage content, members, and rules.
    Admin,
    /// Regular family member.
    Member,
}

impl FamilyRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Admin => 2,
            Self::Member => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &FamilyRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role bypasses per-resource permission grants.
    pub fn is_admin_or_above(&self) -> bool {
        self.has_at_least(&Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for FamilyRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FamilyRole {
    type Err = famvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "member" => Ok(Self::Member),
            _ => Err(famvault_core::AppError::validation(format!(
                "Invalid family role: '{s}'. Expected one of: owner, admin, member"
            ))),
        }
    }
}
