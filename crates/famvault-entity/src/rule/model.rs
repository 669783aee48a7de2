//! Organization rule entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use famvault_core::types::{FamilyId, MemberId, RuleId};

use super::action::RuleAction;
use super::condition::{ConditionLogic, RuleCondition};

/// A file-organization rule.
///
/// Conditions and the action are stored as opaque JSON and parsed into
/// their closed unions at evaluation time, so one corrupt rule can never
/// block organization of other files.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrganizationRule {
    /// Unique rule identifier.
    pub id: RuleId,
    /// The family this rule belongs to.
    pub family_id: FamilyId,
    /// Human-readable rule name.
    pub name: String,
    /// JSON array of conditions (see [`RuleCondition`]).
    pub conditions: serde_json::Value,
    /// How the conditions combine.
    pub condition_logic: ConditionLogic,
    /// JSON action payload (see [`RuleAction`]).
    pub action: serde_json::Value,
    /// Evaluation order; lower runs first.
    pub priority: i32,
    /// Disabled rules never participate in evaluation.
    pub enabled: bool,
    /// The member who created the rule.
    pub created_by: MemberId,
    /// When the rule was created.
    pub created_at: DateTime<Utc>,
    /// When the rule was last updated.
    pub updated_at: DateTime<Utc>,
}

impl OrganizationRule {
    /// Parse the condition list, or `None` when the JSON does not form
    /// the closed condition union.
    pub fn parsed_conditions(&self) -> Option<Vec<RuleCondition>> {
        serde_json::from_value(self.conditions.clone()).ok()
    }

    /// Parse the action payload, or `None` when the JSON does not form
    /// the closed action union.
    pub fn parsed_action(&self) -> Option<RuleAction> {
        serde_json::from_value(self.action.clone()).ok()
    }
}
