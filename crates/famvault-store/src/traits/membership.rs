//! Family membership store trait.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, MemberId};
use famvault_entity::member::{FamilyMember, FamilyRole};

/// Lookup of family memberships and roles.
///
/// Identity and invitations live outside the core; this is the narrow
/// surface the permission resolver needs for the Admin/Owner bypass.
#[async_trait]
pub trait MembershipStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert or update a membership row.
    async fn upsert(&self, member: &FamilyMember) -> AppResult<()>;

    /// Find one membership.
    async fn find(
        &self,
        member_id: MemberId,
        family_id: FamilyId,
    ) -> AppResult<Option<FamilyMember>>;

    /// The member's role in the family, or `None` for non-members.
    async fn role_of(
        &self,
        member_id: MemberId,
        family_id: FamilyId,
    ) -> AppResult<Option<FamilyRole>>;

    /// List a family's members, ordered by display name.
    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<FamilyMember>>;
}
