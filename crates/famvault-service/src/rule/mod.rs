//! Organization rules: pure evaluation engine and administration.

pub mod engine;
pub mod service;

pub use engine::{evaluate_file, RuleMatch};
pub use service::{CreateRuleRequest, ReorderRulesRequest, RuleService, UpdateRuleRequest};
