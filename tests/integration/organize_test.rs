//! Inbox sweep integration tests: rule application, the per-file
//! processing log, failure isolation, and the worker-facing sweeper.

use chrono::Utc;
use famvault_core::error::ErrorKind;
use famvault_core::types::{FolderId, RuleId, TagId};
use famvault_entity::rule::{ConditionLogic, OrganizationRule};
use famvault_service::rule::CreateRuleRequest;
use famvault_service::tag::CreateTagRequest;
use famvault_service::RequestContext;
use famvault_store::{FileStore, ProcessingLogStore, RuleStore, TagStore};
use serde_json::json;
use tokio_util::sync::CancellationToken;

use crate::helpers::TestVault;

async fn move_rule(
    vault: &TestVault,
    ctx: &RequestContext,
    name: &str,
    conditions: serde_json::Value,
    destination: FolderId,
) -> RuleId {
    vault
        .rule_service
        .create_rule(
            ctx,
            CreateRuleRequest {
                name: name.to_string(),
                conditions,
                condition_logic: ConditionLogic::And,
                action: json!({
                    "type": "move_to_folder",
                    "destination_folder_id": destination,
                }),
            },
        )
        .await
        .expect("create rule")
        .id
}

#[tokio::test]
async fn test_sweep_requires_an_inbox() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    let err = vault
        .processor
        .process_inbox(
            owner.family_id,
            Some(owner.member_id),
            &CancellationToken::new(),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_first_matching_rule_wins() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let photos = vault.folder(&owner, "Photos", None).await;
    let misc = vault.folder(&owner, "Misc", None).await;

    let winner = move_rule(
        &vault,
        &owner,
        "jpegs into Photos",
        json!([{"kind": "extension", "value": "jpg, jpeg"}]),
        photos.id,
    )
    .await;
    move_rule(
        &vault,
        &owner,
        "any image into Misc",
        json!([{"kind": "mime_type", "value": "image/*"}]),
        misc.id,
    )
    .await;

    let file = vault
        .upload(&owner, "IMG_001.JPG", Some("image/jpeg"), 2_000_000, None)
        .await;

    let report = vault
        .processor
        .process_inbox(
            owner.family_id,
            Some(owner.member_id),
            &CancellationToken::new(),
        )
        .await
        .expect("sweep");
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.rules_matched, 1);

    // Both rules match the file; only the lower priority applied.
    let moved = vault
        .files
        .find_by_id(file.id)
        .await
        .expect("find file")
        .expect("file exists");
    assert_eq!(moved.folder_id, photos.id);

    let entries = vault.log.list_by_file(file.id).await.expect("log");
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.rule_id, Some(winner));
    assert_eq!(entry.rule_name.as_deref(), Some("jpegs into Photos"));
    assert_eq!(entry.action.as_deref(), Some("move_to_folder"));
    assert_eq!(entry.destination_folder_id, Some(photos.id));
    assert!(entry.succeeded);
    assert_eq!(entry.error, None);
}

#[tokio::test]
async fn test_unmatched_files_are_logged_and_left_in_place() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let file = vault.upload(&owner, "notes.txt", None, 64, None).await;

    let report = vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("sweep");
    assert_eq!(report.files_processed, 1);
    assert_eq!(report.rules_matched, 0);

    let still_there = vault
        .files
        .find_by_id(file.id)
        .await
        .expect("find file")
        .expect("file exists");
    assert_eq!(still_there.folder_id, file.folder_id);

    let entries = vault.log.list_by_file(file.id).await.expect("log");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].rule_id, None);
    assert_eq!(entries[0].rule_name, None);
    assert_eq!(entries[0].action, None);
    assert!(entries[0].succeeded);
}

#[tokio::test]
async fn test_disabled_rules_never_fire() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let photos = vault.folder(&owner, "Photos", None).await;

    let rule = move_rule(
        &vault,
        &owner,
        "disabled",
        json!([{"kind": "extension", "value": "jpg"}]),
        photos.id,
    )
    .await;
    vault
        .rule_service
        .set_enabled(&owner, rule, false)
        .await
        .expect("disable");

    let file = vault
        .upload(&owner, "holiday.jpg", Some("image/jpeg"), 100, None)
        .await;
    let report = vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("sweep");

    assert_eq!(report.rules_matched, 0);
    let unmoved = vault
        .files
        .find_by_id(file.id)
        .await
        .expect("find file")
        .expect("file exists");
    assert_eq!(unmoved.folder_id, file.folder_id);
}

#[tokio::test]
async fn test_a_failing_action_does_not_abort_the_sweep() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    // First rule points at a folder that is gone by sweep time.
    let doomed = vault.folder(&owner, "Doomed", None).await;
    move_rule(
        &vault,
        &owner,
        "pdfs into Doomed",
        json!([{"kind": "extension", "value": "pdf"}]),
        doomed.id,
    )
    .await;
    let keep = vault.folder(&owner, "Keep", None).await;
    move_rule(
        &vault,
        &owner,
        "texts into Keep",
        json!([{"kind": "extension", "value": "txt"}]),
        keep.id,
    )
    .await;
    vault
        .folder_service
        .delete_folder(&owner, doomed.id)
        .await
        .expect("delete destination");

    let pdf = vault.upload(&owner, "a.pdf", None, 10, None).await;
    let txt = vault.upload(&owner, "b.txt", None, 10, None).await;

    let report = vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("sweep");
    assert_eq!(report.files_processed, 2);
    // A match is a match even when applying it fails.
    assert_eq!(report.rules_matched, 2);

    let pdf_after = vault
        .files
        .find_by_id(pdf.id)
        .await
        .expect("find pdf")
        .expect("pdf exists");
    assert_eq!(pdf_after.folder_id, pdf.folder_id);
    let pdf_entries = vault.log.list_by_file(pdf.id).await.expect("log");
    assert_eq!(pdf_entries.len(), 1);
    assert!(!pdf_entries[0].succeeded);
    assert!(pdf_entries[0]
        .error
        .as_deref()
        .expect("error recorded")
        .contains("Destination folder not found"));
    assert_eq!(pdf_entries[0].destination_folder_id, Some(doomed.id));

    let txt_after = vault
        .files
        .find_by_id(txt.id)
        .await
        .expect("find txt")
        .expect("txt exists");
    assert_eq!(txt_after.folder_id, keep.id);
}

#[tokio::test]
async fn test_apply_tags_action() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    let vacation = vault
        .tag_service
        .create_tag(
            &owner,
            CreateTagRequest {
                name: "vacation".to_string(),
                color: None,
            },
        )
        .await
        .expect("tag");
    let beach = vault
        .tag_service
        .create_tag(
            &owner,
            CreateTagRequest {
                name: "beach".to_string(),
                color: Some("#0088ff".to_string()),
            },
        )
        .await
        .expect("tag");

    vault
        .rule_service
        .create_rule(
            &owner,
            CreateRuleRequest {
                name: "tag images".to_string(),
                conditions: json!([{"kind": "mime_type", "value": "image/*"}]),
                condition_logic: ConditionLogic::And,
                action: json!({"type": "apply_tags", "tag_ids": [vacation.id, beach.id]}),
            },
        )
        .await
        .expect("rule");

    let file = vault
        .upload(&owner, "surf.png", Some("image/png"), 100, None)
        .await;
    let report = vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("sweep");
    assert_eq!(report.rules_matched, 1);

    let attached = vault.tags.list_for_file(file.id).await.expect("tags");
    assert_eq!(attached.len(), 2);

    let entries = vault.log.list_by_file(file.id).await.expect("log");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action.as_deref(), Some("apply_tags"));
    assert_eq!(entries[0].destination_folder_id, None);
    assert!(entries[0].succeeded);

    // Tagging does not move the file, so a second sweep sees it again;
    // attach is idempotent and a second log entry is appended.
    vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("second sweep");
    let attached = vault.tags.list_for_file(file.id).await.expect("tags");
    assert_eq!(attached.len(), 2);
    let entries = vault.log.list_by_file(file.id).await.expect("log");
    assert_eq!(entries.len(), 2);
}

#[tokio::test]
async fn test_apply_tags_reports_unknown_ids_but_keeps_the_rest() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    let real = vault
        .tag_service
        .create_tag(
            &owner,
            CreateTagRequest {
                name: "real".to_string(),
                color: None,
            },
        )
        .await
        .expect("tag");
    let ghost = TagId::new();

    vault
        .rule_service
        .create_rule(
            &owner,
            CreateRuleRequest {
                name: "half real".to_string(),
                conditions: json!([{"kind": "extension", "value": "jpg"}]),
                condition_logic: ConditionLogic::And,
                action: json!({"type": "apply_tags", "tag_ids": [real.id, ghost]}),
            },
        )
        .await
        .expect("rule");

    let file = vault.upload(&owner, "x.jpg", None, 1, None).await;
    vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("sweep");

    let attached = vault.tags.list_for_file(file.id).await.expect("tags");
    assert_eq!(attached.len(), 1);
    assert_eq!(attached[0].id, real.id);

    let entries = vault.log.list_by_file(file.id).await.expect("log");
    assert_eq!(entries.len(), 1);
    assert!(!entries[0].succeeded);
    assert!(entries[0]
        .error
        .as_deref()
        .expect("error recorded")
        .contains("Unknown tag ids"));
}

#[tokio::test]
async fn test_corrupt_rule_json_falls_through() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let sorted = vault.folder(&owner, "Sorted", None).await;

    // Seeded below the service layer: the service would reject this.
    let now = Utc::now();
    vault
        .rules
        .insert(&OrganizationRule {
            id: RuleId::new(),
            family_id: owner.family_id,
            name: "corrupt".to_string(),
            conditions: json!({"not": "an array"}),
            condition_logic: ConditionLogic::And,
            action: json!({"type": "move_to_folder", "destination_folder_id": sorted.id}),
            priority: 1,
            enabled: true,
            created_by: owner.member_id,
            created_at: now,
            updated_at: now,
        })
        .await
        .expect("seed corrupt rule");
    move_rule(
        &vault,
        &owner,
        "working",
        json!([{"kind": "name_regex", "value": "report"}]),
        sorted.id,
    )
    .await;

    let file = vault.upload(&owner, "report-2026.txt", None, 1, None).await;
    let report = vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("sweep");
    assert_eq!(report.rules_matched, 1);

    let moved = vault
        .files
        .find_by_id(file.id)
        .await
        .expect("find file")
        .expect("file exists");
    assert_eq!(moved.folder_id, sorted.id);
    let entries = vault.log.list_by_file(file.id).await.expect("log");
    assert_eq!(entries[0].rule_name.as_deref(), Some("working"));
}

#[tokio::test]
async fn test_exactly_one_log_entry_per_file() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let photos = vault.folder(&owner, "Photos", None).await;
    move_rule(
        &vault,
        &owner,
        "images",
        json!([{"kind": "extension", "value": "jpg"}]),
        photos.id,
    )
    .await;

    let matched = vault.upload(&owner, "one.jpg", None, 1, None).await;
    let missed_a = vault.upload(&owner, "two.txt", None, 1, None).await;
    let missed_b = vault.upload(&owner, "three.txt", None, 1, None).await;

    let report = vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("sweep");
    assert_eq!(report.files_processed, 3);
    assert_eq!(report.rules_matched, 1);

    let all = vault
        .log
        .list_by_family(owner.family_id, 100)
        .await
        .expect("log");
    assert_eq!(all.len(), 3);
    for file_id in [matched.id, missed_a.id, missed_b.id] {
        let entries = vault.log.list_by_file(file_id).await.expect("log");
        assert_eq!(entries.len(), 1);
    }
}

#[tokio::test]
async fn test_cancellation_stops_the_sweep_between_files() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    vault.upload(&owner, "a.txt", None, 1, None).await;
    vault.upload(&owner, "b.txt", None, 1, None).await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = vault
        .processor
        .process_inbox(owner.family_id, None, &cancel)
        .await
        .expect("cancelled sweep still returns");
    assert_eq!(report.files_processed, 0);

    let entries = vault
        .log
        .list_by_family(owner.family_id, 100)
        .await
        .expect("log");
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_busy_families_are_skipped_not_queued() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    vault.upload(&owner, "waiting.txt", None, 1, None).await;

    let guard = vault.locks.lock_family(owner.family_id).await;
    let skipped = vault
        .processor
        .try_process_inbox(owner.family_id, &CancellationToken::new())
        .await
        .expect("try sweep");
    assert!(skipped.is_none());

    drop(guard);
    let report = vault
        .processor
        .try_process_inbox(owner.family_id, &CancellationToken::new())
        .await
        .expect("try sweep")
        .expect("lock free now");
    assert_eq!(report.files_processed, 1);
}

#[tokio::test]
async fn test_sweeper_covers_every_pending_family() {
    let vault = TestVault::new();
    let first = vault.family().await;
    let second = vault.family().await;
    vault.upload(&first, "a.txt", None, 1, None).await;
    vault.upload(&first, "b.txt", None, 1, None).await;
    vault.upload(&second, "c.txt", None, 1, None).await;

    let pending = vault.sweeper.pending_families().await.expect("pending");
    assert_eq!(pending.len(), 2);

    let stats = vault
        .sweeper
        .sweep_pending(&CancellationToken::new())
        .await
        .expect("sweep pending");
    assert_eq!(stats.families_swept, 2);
    assert_eq!(stats.families_skipped, 0);
    assert_eq!(stats.families_failed, 0);
    assert_eq!(stats.files_processed, 3);
    assert_eq!(stats.rules_matched, 0);

    // Unmatched files stay in the inbox, so both families remain pending;
    // a held lock turns a sweep into a skip.
    let _guard = vault.locks.lock_family(first.family_id).await;
    let stats = vault
        .sweeper
        .sweep_pending(&CancellationToken::new())
        .await
        .expect("sweep pending");
    assert_eq!(stats.families_swept, 1);
    assert_eq!(stats.families_skipped, 1);
}

#[tokio::test]
async fn test_only_inbox_files_are_swept() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    vault
        .folder_service
        .get_or_create_inbox(&owner)
        .await
        .expect("inbox");
    let shelf = vault.folder(&owner, "Shelf", None).await;
    vault
        .upload(&owner, "shelved.jpg", None, 1, Some(shelf.id))
        .await;

    let pending = vault.sweeper.pending_families().await.expect("pending");
    assert!(pending.is_empty());

    let report = vault
        .processor
        .process_inbox(owner.family_id, None, &CancellationToken::new())
        .await
        .expect("sweep");
    assert_eq!(report.files_processed, 0);
}
