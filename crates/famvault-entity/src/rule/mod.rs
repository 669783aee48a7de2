//! Organization rule domain entities.

pub mod action;
pub mod condition;
pub mod model;

pub use action::RuleAction;
pub use condition::{ConditionLogic, RuleCondition};
pub use model::OrganizationRule;
