//! Organization rule administration.
//!
//! Rules are family-wide policy, so mutations require the Admin (or
//! Owner) role; any member may list them. Payloads are validated against
//! the closed condition/action unions here, while evaluation stays
//! tolerant of rows that were corrupted after the fact.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use famvault_core::error::AppError;
use famvault_core::types::RuleId;
use famvault_entity::member::FamilyRole;
use famvault_entity::rule::{ConditionLogic, OrganizationRule, RuleAction, RuleCondition};
use famvault_store::{MembershipStore, RuleStore};

use crate::context::RequestContext;

/// Manages organization rules.
#[derive(Debug, Clone)]
pub struct RuleService {
    /// Rule store.
    rules: Arc<dyn RuleStore>,
    /// Membership lookup (role checks).
    memberships: Arc<dyn MembershipStore>,
}

/// Data for creating a rule. Priority is auto-assigned to run last.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRuleRequest {
    /// Rule name.
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    /// JSON array of `{kind, value}` conditions.
    pub conditions: serde_json::Value,
    /// How the conditions combine.
    pub condition_logic: ConditionLogic,
    /// JSON action payload.
    pub action: serde_json::Value,
}

/// Data for updating a rule. Omitted fields keep their current value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateRuleRequest {
    /// New rule name.
    pub name: Option<String>,
    /// New conditions array.
    pub conditions: Option<serde_json::Value>,
    /// New condition logic.
    pub condition_logic: Option<ConditionLogic>,
    /// New action payload.
    pub action: Option<serde_json::Value>,
}

/// Data for bulk priority reassignment.
///
/// The listed rules receive priorities 1..=N in the given order. Rules
/// left out keep their old priority; priorities are not required to be
/// unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRulesRequest {
    /// Rule IDs in the desired evaluation order.
    pub rule_ids: Vec<RuleId>,
}

impl RuleService {
    /// Creates a new rule service.
    pub fn new(rules: Arc<dyn RuleStore>, memberships: Arc<dyn MembershipStore>) -> Self {
        Self { rules, memberships }
    }

    /// Creates a rule with the next free priority (max existing + 1).
    pub async fn create_rule(
        &self,
        ctx: &RequestContext,
        req: CreateRuleRequest,
    ) -> Result<OrganizationRule, AppError> {
        self.require_admin(ctx).await?;
        req.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Rule name cannot be empty"));
        }
        validate_conditions(&req.conditions)?;
        validate_action(&req.action)?;

        let priority = self.rules.max_priority(ctx.family_id).await?.unwrap_or(0) + 1;

        let now = Utc::now();
        let rule = OrganizationRule {
            id: RuleId::new(),
            family_id: ctx.family_id,
            name: req.name,
            conditions: req.conditions,
            condition_logic: req.condition_logic,
            action: req.action,
            priority,
            enabled: true,
            created_by: ctx.member_id,
            created_at: now,
            updated_at: now,
        };
        self.rules.insert(&rule).await?;

        info!(
            member_id = %ctx.member_id,
            rule_id = %rule.id,
            priority = rule.priority,
            "Organization rule created"
        );

        Ok(rule)
    }

    /// Updates a rule's name, conditions, logic, or action.
    pub async fn update_rule(
        &self,
        ctx: &RequestContext,
        rule_id: RuleId,
        req: UpdateRuleRequest,
    ) -> Result<OrganizationRule, AppError> {
        self.require_admin(ctx).await?;
        let mut rule = self.load_rule(ctx, rule_id).await?;

        if let Some(name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Rule name cannot be empty"));
            }
            rule.name = name;
        }
        if let Some(conditions) = req.conditions {
            validate_conditions(&conditions)?;
            rule.conditions = conditions;
        }
        if let Some(logic) = req.condition_logic {
            rule.condition_logic = logic;
        }
        if let Some(action) = req.action {
            validate_action(&action)?;
            rule.action = action;
        }

        let rule = self.rules.update(&rule).await?;

        info!(member_id = %ctx.member_id, rule_id = %rule_id, "Organization rule updated");

        Ok(rule)
    }

    /// Deletes a rule.
    pub async fn delete_rule(&self, ctx: &RequestContext, rule_id: RuleId) -> Result<(), AppError> {
        self.require_admin(ctx).await?;
        self.load_rule(ctx, rule_id).await?;

        self.rules.remove(rule_id).await?;

        info!(member_id = %ctx.member_id, rule_id = %rule_id, "Organization rule deleted");

        Ok(())
    }

    /// Enables or disables a rule without deleting it.
    pub async fn set_enabled(
        &self,
        ctx: &RequestContext,
        rule_id: RuleId,
        enabled: bool,
    ) -> Result<OrganizationRule, AppError> {
        self.require_admin(ctx).await?;
        self.load_rule(ctx, rule_id).await?;

        let rule = self.rules.set_enabled(rule_id, enabled).await?;

        info!(
            member_id = %ctx.member_id,
            rule_id = %rule_id,
            enabled = enabled,
            "Organization rule toggled"
        );

        Ok(rule)
    }

    /// Reassigns priorities 1..=N following the given order.
    pub async fn reorder_rules(
        &self,
        ctx: &RequestContext,
        req: ReorderRulesRequest,
    ) -> Result<(), AppError> {
        self.require_admin(ctx).await?;
        if req.rule_ids.is_empty() {
            return Err(AppError::validation("At least one rule id is required"));
        }
        let unique: HashSet<RuleId> = req.rule_ids.iter().copied().collect();
        if unique.len() != req.rule_ids.len() {
            return Err(AppError::validation("Duplicate rule ids in reorder"));
        }

        let known: HashSet<RuleId> = self
            .rules
            .list_by_family(ctx.family_id)
            .await?
            .into_iter()
            .map(|r| r.id)
            .collect();
        for id in &req.rule_ids {
            if !known.contains(id) {
                return Err(AppError::not_found(format!(
                    "Rule {id} not found in this family"
                )));
            }
        }

        self.rules
            .set_priorities(ctx.family_id, &req.rule_ids)
            .await?;

        info!(
            member_id = %ctx.member_id,
            rules = req.rule_ids.len(),
            "Organization rules reordered"
        );

        Ok(())
    }

    /// Lists the family's rules, priority ascending.
    pub async fn list_rules(&self, ctx: &RequestContext) -> Result<Vec<OrganizationRule>, AppError> {
        self.require_member(ctx).await?;
        self.rules.list_by_family(ctx.family_id).await
    }

    /// Gets a single rule.
    pub async fn get_rule(
        &self,
        ctx: &RequestContext,
        rule_id: RuleId,
    ) -> Result<OrganizationRule, AppError> {
        self.require_member(ctx).await?;
        self.load_rule(ctx, rule_id).await
    }

    async fn load_rule(
        &self,
        ctx: &RequestContext,
        rule_id: RuleId,
    ) -> Result<OrganizationRule, AppError> {
        let rule = self
            .rules
            .find_by_id(rule_id)
            .await?
            .ok_or_else(|| AppError::not_found("Rule not found"))?;
        if rule.family_id != ctx.family_id {
            return Err(AppError::forbidden("Rule belongs to another family"));
        }
        Ok(rule)
    }

    async fn require_member(&self, ctx: &RequestContext) -> Result<FamilyRole, AppError> {
        self.memberships
            .role_of(ctx.member_id, ctx.family_id)
            .await?
            .ok_or_else(|| AppError::forbidden("Not a member of this family"))
    }

    async fn require_admin(&self, ctx: &RequestContext) -> Result<(), AppError> {
        let role = self.require_member(ctx).await?;
        if !role.is_admin_or_above() {
            return Err(AppError::forbidden(
                "Managing organization rules requires the Admin role",
            ));
        }
        Ok(())
    }
}

fn validate_conditions(value: &serde_json::Value) -> Result<(), AppError> {
    serde_json::from_value::<Vec<RuleCondition>>(value.clone())
        .map(|_| ())
        .map_err(|e| AppError::validation(format!("Invalid rule conditions: {e}")))
}

fn validate_action(value: &serde_json::Value) -> Result<(), AppError> {
    serde_json::from_value::<RuleAction>(value.clone())
        .map(|_| ())
        .map_err(|e| AppError::validation(format!("Invalid rule action: {e}")))
}
