//! Rule action types.

use serde::{Deserialize, Serialize};

use famvault_core::types::{FolderId, TagId};

/// The action a rule applies to a matching file, stored as JSON on the
/// rule row.
///
/// Like conditions, actions are parsed at evaluation time; a payload that
/// does not parse makes the rule a no-match rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleAction {
    /// Move the file to the given folder.
    MoveToFolder {
        /// Destination folder id.
        destination_folder_id: FolderId,
    },
    /// Attach the given tags to the file (idempotently).
    ApplyTags {
        /// Tags to apply.
        tag_ids: Vec<TagId>,
    },
}

impl RuleAction {
    /// Stable action code recorded in processing log entries.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MoveToFolder { .. } => "move_to_folder",
            Self::ApplyTags { .. } => "apply_tags",
        }
    }
}
