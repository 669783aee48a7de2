//! Inbox sweep orchestrator.
//!
//! Walks a family's Inbox, evaluates every file against the family's
//! enabled rules and applies the first matching action. Exactly one
//! processing log entry is recorded per file, matched or not. One failing
//! file never aborts the sweep; cancellation is honored between files.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use famvault_core::error::AppError;
use famvault_core::types::{FamilyId, FolderId, LogEntryId, MemberId, RuleId, TagId};
use famvault_entity::file::StoredFile;
use famvault_entity::processing::ProcessingLogEntry;
use famvault_entity::rule::RuleAction;
use famvault_store::{FileStore, FolderStore, ProcessingLogStore, RuleStore, TagStore};

use crate::folder::FamilyLocks;
use crate::rule::{evaluate_file, RuleMatch};

/// Summary of one inbox sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InboxReport {
    /// Files evaluated during the sweep.
    pub files_processed: u64,
    /// Files that matched a rule, whether or not the action succeeded.
    pub rules_matched: u64,
}

/// Runs inbox sweeps for families.
#[derive(Debug, Clone)]
pub struct InboxProcessor {
    /// Folder store (Inbox and move destinations).
    folders: Arc<dyn FolderStore>,
    /// File store.
    files: Arc<dyn FileStore>,
    /// Rule store.
    rules: Arc<dyn RuleStore>,
    /// Tag store (ApplyTags actions).
    tags: Arc<dyn TagStore>,
    /// Append-only processing log.
    log: Arc<dyn ProcessingLogStore>,
    /// Per-family mutual exclusion, shared with the folder service.
    locks: Arc<FamilyLocks>,
}

impl InboxProcessor {
    /// Creates a new inbox processor.
    pub fn new(
        folders: Arc<dyn FolderStore>,
        files: Arc<dyn FileStore>,
        rules: Arc<dyn RuleStore>,
        tags: Arc<dyn TagStore>,
        log: Arc<dyn ProcessingLogStore>,
        locks: Arc<FamilyLocks>,
    ) -> Self {
        Self {
            folders,
            files,
            rules,
            tags,
            log,
            locks,
        }
    }

    /// Sweeps the family's Inbox, waiting for any in-flight sweep or
    /// structural mutation on the same family to finish first.
    pub async fn process_inbox(
        &self,
        family_id: FamilyId,
        triggered_by: Option<MemberId>,
        cancel: &CancellationToken,
    ) -> Result<InboxReport, AppError> {
        let _guard = self.locks.lock_family(family_id).await;
        self.run(family_id, triggered_by, cancel).await
    }

    /// Sweeps the family's Inbox unless the family is already locked, in
    /// which case `Ok(None)` is returned. The background worker uses this
    /// to skip busy families rather than queue behind them.
    pub async fn try_process_inbox(
        &self,
        family_id: FamilyId,
        cancel: &CancellationToken,
    ) -> Result<Option<InboxReport>, AppError> {
        let Some(_guard) = self.locks.try_lock_family(family_id) else {
            return Ok(None);
        };
        self.run(family_id, None, cancel).await.map(Some)
    }

    async fn run(
        &self,
        family_id: FamilyId,
        triggered_by: Option<MemberId>,
        cancel: &CancellationToken,
    ) -> Result<InboxReport, AppError> {
        let inbox = self
            .folders
            .find_inbox(family_id)
            .await?
            .ok_or_else(|| AppError::not_found("The family has no Inbox folder"))?;

        let pending = self.files.list_by_folder(inbox.id).await?;
        let rules = self.rules.list_enabled_by_family(family_id).await?;

        let mut report = InboxReport {
            files_processed: 0,
            rules_matched: 0,
        };

        for file in pending {
            if cancel.is_cancelled() {
                info!(
                    family_id = %family_id,
                    files_processed = report.files_processed,
                    "Inbox sweep cancelled"
                );
                break;
            }
            report.files_processed += 1;

            let outcome = match evaluate_file(&file, &rules) {
                None => SweepOutcome::no_match(),
                Some(matched) => {
                    report.rules_matched += 1;
                    self.apply_match(family_id, &file, matched).await
                }
            };

            let entry = ProcessingLogEntry {
                id: LogEntryId::new(),
                family_id,
                file_id: file.id,
                file_name: file.name.clone(),
                rule_id: outcome.rule_id,
                rule_name: outcome.rule_name,
                action: outcome.action,
                destination_folder_id: outcome.destination_folder_id,
                succeeded: outcome.succeeded,
                error: outcome.error,
                created_at: Utc::now(),
            };
            // The sweep outcome already happened; a log write failure must
            // not take down the remaining files.
            if let Err(e) = self.log.append(&entry).await {
                warn!(
                    family_id = %family_id,
                    file_id = %file.id,
                    error = %e,
                    "Processing log append failed"
                );
            }
        }

        info!(
            family_id = %family_id,
            triggered_by = ?triggered_by,
            files_processed = report.files_processed,
            rules_matched = report.rules_matched,
            "Inbox sweep completed"
        );

        Ok(report)
    }

    /// Applies the matched action, folding store failures into the
    /// outcome so a bad destination or tag never aborts the sweep.
    async fn apply_match(
        &self,
        family_id: FamilyId,
        file: &StoredFile,
        matched: RuleMatch,
    ) -> SweepOutcome {
        let mut outcome = SweepOutcome {
            rule_id: Some(matched.rule_id),
            rule_name: Some(matched.rule_name),
            action: Some(matched.action.code().to_string()),
            destination_folder_id: None,
            succeeded: true,
            error: None,
        };

        let result = match matched.action {
            RuleAction::MoveToFolder {
                destination_folder_id,
            } => {
                outcome.destination_folder_id = Some(destination_folder_id);
                self.move_to_folder(family_id, file, destination_folder_id)
                    .await
            }
            RuleAction::ApplyTags { tag_ids } => self.apply_tags(family_id, file, &tag_ids).await,
        };

        if let Err(e) = result {
            outcome.succeeded = false;
            outcome.error = Some(e.to_string());
        }
        outcome
    }

    async fn move_to_folder(
        &self,
        family_id: FamilyId,
        file: &StoredFile,
        destination: FolderId,
    ) -> Result<(), AppError> {
        let folder = self
            .folders
            .find_by_id(destination)
            .await?
            .ok_or_else(|| AppError::not_found("Destination folder not found"))?;
        if folder.family_id != family_id {
            return Err(AppError::forbidden(
                "Destination folder belongs to another family",
            ));
        }
        self.files.update_folder(file.id, destination).await?;
        Ok(())
    }

    /// Attaches every tag that resolves within the family, then reports
    /// the ids that did not.
    async fn apply_tags(
        &self,
        family_id: FamilyId,
        file: &StoredFile,
        tag_ids: &[TagId],
    ) -> Result<(), AppError> {
        let known = self.tags.list_by_ids(tag_ids).await?;
        let usable: HashSet<TagId> = known
            .iter()
            .filter(|t| t.family_id == family_id)
            .map(|t| t.id)
            .collect();

        for tag_id in tag_ids {
            if usable.contains(tag_id) {
                self.tags.attach(file.id, *tag_id).await?;
            }
        }

        let unknown: Vec<String> = tag_ids
            .iter()
            .filter(|id| !usable.contains(id))
            .map(|id| id.to_string())
            .collect();
        if !unknown.is_empty() {
            return Err(AppError::not_found(format!(
                "Unknown tag ids: {}",
                unknown.join(", ")
            )));
        }
        Ok(())
    }
}

/// What one file's pass through the sweep produced, shaped for the log.
struct SweepOutcome {
    rule_id: Option<RuleId>,
    rule_name: Option<String>,
    action: Option<String>,
    destination_folder_id: Option<FolderId>,
    succeeded: bool,
    error: Option<String>,
}

impl SweepOutcome {
    fn no_match() -> Self {
        Self {
            rule_id: None,
            rule_name: None,
            action: None,
            destination_folder_id: None,
            succeeded: true,
            error: None,
        }
    }
}
