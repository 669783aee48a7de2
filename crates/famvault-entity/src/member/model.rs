//! Family member entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use famvault_core::types::{FamilyId, MemberId};

use super::role::FamilyRole;

/// A member's standing within one family.
///
/// Identity/authentication is out of scope; the core consumes only the
/// role, which drives the Admin/Owner permission bypass.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FamilyMember {
    /// The member's identifier.
    pub member_id: MemberId,
    /// The family this membership belongs to.
    pub family_id: FamilyId,
    /// Display name inside the family.
    pub display_name: String,
    /// The member's role in the family.
    pub role: FamilyRole,
    /// When the member joined the family.
    pub joined_at: DateTime<Utc>,
}
