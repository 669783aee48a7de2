//! Rule condition types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a rule combines its conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "condition_logic", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConditionLogic {
    /// Every condition must match. A rule with zero conditions never matches.
    And,
    /// At least one condition must match.
    Or,
}

impl ConditionLogic {
    /// Return the logic as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

impl fmt::Display for ConditionLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ConditionLogic {
    type Err = famvault_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" => Ok(Self::And),
            "or" => Ok(Self::Or),
            _ => Err(famvault_core::AppError::validation(format!(
                "Invalid condition logic: '{s}'. Expected 'and' or 'or'"
            ))),
        }
    }
}

/// A single rule condition, stored as JSON on the rule row.
///
/// The wire shape is `{"kind": "...", "value": "..."}`. The value is
/// always a string; how it is interpreted depends on the kind. Rows with
/// JSON that does not parse into this closed union are treated as
/// never-matching by the engine, never as an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RuleCondition {
    /// Comma-joined list of file extensions, with or without leading dots.
    /// Matches when the file name's extension equals any, case-insensitive.
    Extension(String),
    /// Exact MIME string, or a `type/*` wildcard matching the major type.
    MimeType(String),
    /// Regular expression; matches when it finds anywhere in the file name.
    /// An invalid pattern never matches.
    NameRegex(String),
    /// Decimal byte count; matches when the file is strictly larger.
    SizeGreaterThan(String),
    /// Decimal byte count; matches when the file is strictly smaller.
    SizeLessThan(String),
}
