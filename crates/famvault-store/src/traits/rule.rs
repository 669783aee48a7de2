//! Organization rule store trait.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, RuleId};
use famvault_entity::rule::OrganizationRule;

/// Persistence operations for organization rules.
#[async_trait]
pub trait RuleStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a fully-populated rule row.
    async fn insert(&self, rule: &OrganizationRule) -> AppResult<()>;

    /// Find a rule by ID.
    async fn find_by_id(&self, id: RuleId) -> AppResult<Option<OrganizationRule>>;

    /// List all rules of a family, priority ascending.
    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<OrganizationRule>>;

    /// List enabled rules of a family, priority ascending. This is the
    /// exact input the evaluation engine expects.
    async fn list_enabled_by_family(
        &self,
        family_id: FamilyId,
    ) -> AppResult<Vec<OrganizationRule>>;

    /// Highest priority currently assigned in the family, if any.
    async fn max_priority(&self, family_id: FamilyId) -> AppResult<Option<i32>>;

    /// Persist changed rule fields (name, conditions, logic, action).
    async fn update(&self, rule: &OrganizationRule) -> AppResult<OrganizationRule>;

    /// Toggle a rule without deleting it.
    async fn set_enabled(&self, id: RuleId, enabled: bool) -> AppResult<OrganizationRule>;

    /// Reassign priorities 1..=N following the given order, atomically.
    /// The caller has already validated that the ids belong to the family.
    async fn set_priorities(&self, family_id: FamilyId, ordered_ids: &[RuleId]) -> AppResult<()>;

    /// Delete a rule. Returns `false` when it was already gone.
    async fn remove(&self, id: RuleId) -> AppResult<bool>;
}
