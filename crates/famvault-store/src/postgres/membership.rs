//! PostgreSQL family membership store.

use async_trait::async_trait;
use sqlx::PgPool;

use famvault_core::error::{AppError, ErrorKind};
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, MemberId};
use famvault_entity::member::{FamilyMember, FamilyRole};

use crate::traits::MembershipStore;

/// Family membership store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgMembershipStore {
    pool: PgPool,
}

impl PgMembershipStore {
    /// Create a new membership store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MembershipStore for PgMembershipStore {
    async fn upsert(&self, member: &FamilyMember) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO family_members (member_id, family_id, display_name, role, joined_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (member_id, family_id) \
             DO UPDATE SET display_name = EXCLUDED.display_name, role = EXCLUDED.role",
        )
        .bind(member.member_id)
        .bind(member.family_id)
        .bind(&member.display_name)
        .bind(member.role)
        .bind(member.joined_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert member", e))?;
        Ok(())
    }

    async fn find(
        &self,
        member_id: MemberId,
        family_id: FamilyId,
    ) -> AppResult<Option<FamilyMember>> {
        sqlx::query_as::<_, FamilyMember>(
            "SELECT * FROM family_members WHERE member_id = $1 AND family_id = $2",
        )
        .bind(member_id)
        .bind(family_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find member", e))
    }

    async fn role_of(
        &self,
        member_id: MemberId,
        family_id: FamilyId,
    ) -> AppResult<Option<FamilyRole>> {
        let row: Option<(FamilyRole,)> = sqlx::query_as(
            "SELECT role FROM family_members WHERE member_id = $1 AND family_id = $2",
        )
        .bind(member_id)
        .bind(family_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to read role", e))?;
        Ok(row.map(|(role,)| role))
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<FamilyMember>> {
        sqlx::query_as::<_, FamilyMember>(
            "SELECT * FROM family_members WHERE family_id = $1 ORDER BY display_name ASC",
        )
        .bind(family_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list members", e))
    }
}
