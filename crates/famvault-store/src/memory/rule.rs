//! In-memory organization rule store.

use async_trait::async_trait;
use chrono::Utc;

use famvault_core::error::AppError;
use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, RuleId};
use famvault_entity::rule::OrganizationRule;

use crate::traits::RuleStore;

use super::db::MemoryDb;

/// Organization rule store over the shared in-memory database.
#[derive(Debug, Clone)]
pub struct MemoryRuleStore {
    db: MemoryDb,
}

impl MemoryRuleStore {
    /// Create a new rule store over the given database.
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }
}

fn sorted_by_priority(mut rules: Vec<OrganizationRule>) -> Vec<OrganizationRule> {
    rules.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    rules
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn insert(&self, rule: &OrganizationRule) -> AppResult<()> {
        let mut state = self.db.write().await;
        state.rules.insert(rule.id, rule.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: RuleId) -> AppResult<Option<OrganizationRule>> {
        let state = self.db.read().await;
        Ok(state.rules.get(&id).cloned())
    }

    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<OrganizationRule>> {
        let state = self.db.read().await;
        let rules = state
            .rules
            .values()
            .filter(|r| r.family_id == family_id)
            .cloned()
            .collect();
        Ok(sorted_by_priority(rules))
    }

    async fn list_enabled_by_family(
        &self,
        family_id: FamilyId,
    ) -> AppResult<Vec<OrganizationRule>> {
        let state = self.db.read().await;
        let rules = state
            .rules
            .values()
            .filter(|r| r.family_id == family_id && r.enabled)
            .cloned()
            .collect();
        Ok(sorted_by_priority(rules))
    }

    async fn max_priority(&self, family_id: FamilyId) -> AppResult<Option<i32>> {
        let state = self.db.read().await;
        Ok(state
            .rules
            .values()
            .filter(|r| r.family_id == family_id)
            .map(|r| r.priority)
            .max())
    }

    async fn update(&self, rule: &OrganizationRule) -> AppResult<OrganizationRule> {
        let mut state = self.db.write().await;
        let stored = state
            .rules
            .get_mut(&rule.id)
            .ok_or_else(|| AppError::not_found(format!("Rule {} not found", rule.id)))?;
        stored.name = rule.name.clone();
        stored.conditions = rule.conditions.clone();
        stored.condition_logic = rule.condition_logic;
        stored.action = rule.action.clone();
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn set_enabled(&self, id: RuleId, enabled: bool) -> AppResult<OrganizationRule> {
        let mut state = self.db.write().await;
        let rule = state
            .rules
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(format!("Rule {id} not found")))?;
        rule.enabled = enabled;
        rule.updated_at = Utc::now();
        Ok(rule.clone())
    }

    async fn set_priorities(&self, family_id: FamilyId, ordered_ids: &[RuleId]) -> AppResult<()> {
        let mut state = self.db.write().await;
        for (index, rule_id) in ordered_ids.iter().enumerate() {
            if let Some(rule) = state.rules.get_mut(rule_id) {
                if rule.family_id == family_id {
                    rule.priority = (index + 1) as i32;
                    rule.updated_at = Utc::now();
                }
            }
        }
        Ok(())
    }

    async fn remove(&self, id: RuleId) -> AppResult<bool> {
        let mut state = self.db.write().await;
        Ok(state.rules.remove(&id).is_some())
    }
}
