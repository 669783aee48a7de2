//! In-memory family membership store.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, MemberId};
use famvault_entity::member::{FamilyMember, FamilyRole};

use crate::traits::MembershipStore;

use super::db::MemoryDb;

/// Family membership store over the shared in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryMembershipStore {
    db: MemoryDb,
}

impl MemoryMembershipStore {
    /// Create a new membership store over the given database.
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MembershipStore for MemoryMembershipStore {
    async fn upsert(&self, member: &FamilyMember) -> AppResult<()> {
        let mut state = self.db.write().await;
        state
            .members
            .entry((member.member_id, member.family_id))
            .and_modify(|existing| {
                // joined_at survives re-upserts, matching the SQL upsert.
                existing.display_name = member.display_name.clone();
                existing.role = member.role;
            })
            .or_insert_with(|| member.clone());
        Ok(())
    }

    async fn find(
        &self,
        member_id: MemberId,
        family_id: FamilyId,
    ) -> AppResult<Option<FamilyMember>> {
        let state = self.db.read().await;
        Ok(state.members.get(&(member_id, family_id)).cloned())
    }

    async fn role_of(
        &self,
        member_id: MemberId,
        family_id: FamilyId,
    ) -> AppResult<Option<FamilyRole>> {
        let state = self.db.read().await;
        Ok(state.members.get(&(member_id, family_id)).map(|m| m.role))
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<FamilyMember>> {
        let state = self.db.read().await;
        let mut members: Vec<FamilyMember> = state
            .members
            .values()
            .filter(|m| m.family_id == family_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(members)
    }
}
