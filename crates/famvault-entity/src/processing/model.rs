//! Processing log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use famvault_core::types::{FamilyId, FileId, FolderId, LogEntryId, RuleId};

/// An immutable record of one file passing through an inbox sweep.
///
/// Exactly one entry is written per file per sweep, matched or not. The
/// file name and rule name are snapshots: the entry stays meaningful even
/// after the file or rule is renamed or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProcessingLogEntry {
    /// Unique entry identifier.
    pub id: LogEntryId,
    /// The family whose inbox was swept.
    pub family_id: FamilyId,
    /// The file that was evaluated.
    pub file_id: FileId,
    /// File name at the time of processing.
    pub file_name: String,
    /// The rule that matched, if any.
    pub rule_id: Option<RuleId>,
    /// Name of the matched rule at the time of processing.
    pub rule_name: Option<String>,
    /// Stable code of the action taken (e.g., `"move_to_folder"`).
    pub action: Option<String>,
    /// Destination folder for move actions.
    pub destination_folder_id: Option<FolderId>,
    /// Whether the action (or the no-match pass) completed cleanly.
    pub succeeded: bool,
    /// Error detail when `succeeded` is false.
    pub error: Option<String>,
    /// When the entry was recorded.
    pub created_at: DateTime<Utc>,
}
