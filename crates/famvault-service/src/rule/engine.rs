//! Rule evaluation engine.
//!
//! Pure functions, no I/O. The caller supplies enabled rules sorted by
//! ascending priority; the first matching rule wins. No best-match or
//! multi-match merging.

use regex::Regex;

use famvault_core::types::RuleId;
use famvault_entity::file::StoredFile;
use famvault_entity::rule::{ConditionLogic, OrganizationRule, RuleAction, RuleCondition};

/// The rule a file matched, with the parsed action to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleMatch {
    /// The matched rule's ID.
    pub rule_id: RuleId,
    /// The matched rule's name at evaluation time.
    pub rule_name: String,
    /// The action to apply.
    pub action: RuleAction,
}

/// Evaluates a file against rules in the given order and returns the
/// first match.
///
/// A rule whose condition or action JSON does not parse into the closed
/// unions never matches; a corrupt rule falls through to the next one
/// instead of failing the evaluation.
pub fn evaluate_file(file: &StoredFile, rules: &[OrganizationRule]) -> Option<RuleMatch> {
    rules.iter().find_map(|rule| {
        let action = rule_action_if_matched(file, rule)?;
        Some(RuleMatch {
            rule_id: rule.id,
            rule_name: rule.name.clone(),
            action,
        })
    })
}

fn rule_action_if_matched(file: &StoredFile, rule: &OrganizationRule) -> Option<RuleAction> {
    let conditions = rule.parsed_conditions()?;
    let matched = match rule.condition_logic {
        // A rule with zero conditions never matches.
        ConditionLogic::And => {
            !conditions.is_empty() && conditions.iter().all(|c| condition_matches(file, c))
        }
        ConditionLogic::Or => conditions.iter().any(|c| condition_matches(file, c)),
    };
    if !matched {
        return None;
    }
    rule.parsed_action()
}

/// Evaluates one condition against a file.
pub fn condition_matches(file: &StoredFile, condition: &RuleCondition) -> bool {
    match condition {
        RuleCondition::Extension(list) => {
            let Some(ext) = file.extension() else {
                return false;
            };
            list.split(',')
                .map(|e| e.trim().trim_start_matches('.'))
                .filter(|e| !e.is_empty())
                .any(|e| e.eq_ignore_ascii_case(&ext))
        }
        RuleCondition::MimeType(pattern) => {
            let Some(mime) = file.mime_type.as_deref() else {
                return false;
            };
            match pattern.strip_suffix("/*") {
                Some(major) => mime
                    .split('/')
                    .next()
                    .is_some_and(|m| m.eq_ignore_ascii_case(major)),
                None => mime.eq_ignore_ascii_case(pattern),
            }
        }
        RuleCondition::NameRegex(pattern) => Regex::new(pattern)
            .map(|re| re.is_match(&file.name))
            .unwrap_or(false),
        RuleCondition::SizeGreaterThan(value) => value
            .trim()
            .parse::<i64>()
            .map(|n| file.size_bytes > n)
            .unwrap_or(false),
        RuleCondition::SizeLessThan(value) => value
            .trim()
            .parse::<i64>()
            .map(|n| file.size_bytes < n)
            .unwrap_or(false),
    }
}
