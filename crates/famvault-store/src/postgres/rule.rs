//! PostgreSQL organization rule store.

use async_trait::async_trait;
use sqlx::PgPool;

use famvault_core::error::{AppError, ErrorKind};
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, RuleId};
use famvault_entity::rule::OrganizationRule;

use crate::traits::RuleStore;

/// Organization rule store backed by PostgreSQL.
#[derive(Debug, Clone)]
pub struct PgRuleStore {
    pool: PgPool,
}

impl PgRuleStore {
    /// Create a new rule store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleStore for PgRuleStore {
    async fn insert(&self, rule: &OrganizationRule) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO organization_rules \
             (id, family_id, name, conditions, condition_logic, action, priority, enabled, \
              created_by, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(rule.id)
        .bind(rule.family_id)
        .bind(&rule.name)
        .bind(&rule.conditions)
        .bind(rule.condition_logic)
        .bind(&rule.action)
        .bind(rule.priority)
        .bind(rule.enabled)
        .bind(rule.created_by)
        .bind(rule.created_at)
        .bind(rule.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert rule", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: RuleId) -> AppResult<Option<OrganizationRule>> {
        sqlx::query_as::<_, OrganizationRule>("SELECT * FROM organization_rules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find rule", e))
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<OrganizationRule>> {
        sqlx::query_as::<_, OrganizationRule>(
            "SELECT * FROM organization_rules WHERE family_id = $1 \
             ORDER BY priority ASC, created_at ASC",
        )
        .bind(family_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list rules", e))
    }

    async fn list_enabled_by_family(
        &self,
        family_id: FamilyId,
    ) -> AppResult<Vec<OrganizationRule>> {
        sqlx::query_as::<_, OrganizationRule>(
            "SELECT * FROM organization_rules WHERE family_id = $1 AND enabled = TRUE \
             ORDER BY priority ASC, created_at ASC",
        )
        .bind(family_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list enabled rules", e))
    }

    async fn max_priority(&self, family_id: FamilyId) -> AppResult<Option<i32>> {
        let row: (Option<i32>,) =
            sqlx::query_as("SELECT MAX(priority) FROM organization_rules WHERE family_id = $1")
                .bind(family_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to read max priority", e)
                })?;
        Ok(row.0)
    }

    async fn update(&self, rule: &OrganizationRule) -> AppResult<OrganizationRule> {
        sqlx::query_as::<_, OrganizationRule>(
            "UPDATE organization_rules \
             SET name = $2, conditions = $3, condition_logic = $4, action = $5, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(rule.id)
        .bind(&rule.name)
        .bind(&rule.conditions)
        .bind(rule.condition_logic)
        .bind(&rule.action)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update rule", e))?
        .ok_or_else(|| AppError::not_found(format!("Rule {} not found", rule.id)))
    }

    async fn set_enabled(&self, id: RuleId, enabled: bool) -> AppResult<OrganizationRule> {
        sqlx::query_as::<_, OrganizationRule>(
            "UPDATE organization_rules SET enabled = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(enabled)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to toggle rule", e))?
        .ok_or_else(|| AppError::not_found(format!("Rule {id} not found")))
    }

    async fn set_priorities(&self, family_id: FamilyId, ordered_ids: &[RuleId]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        for (index, rule_id) in ordered_ids.iter().enumerate() {
            sqlx::query(
                "UPDATE organization_rules SET priority = $3, updated_at = NOW() \
                 WHERE id = $1 AND family_id = $2",
            )
            .bind(*rule_id)
            .bind(family_id)
            .bind((index + 1) as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn remove(&self, id: RuleId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM organization_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to remove rule", e))?;
        Ok(result.rows_affected() > 0)
    }
}
