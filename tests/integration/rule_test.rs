//! Organization rule administration tests: priorities, payload
//! validation, role requirements, and reordering.

use famvault_core::error::ErrorKind;
use famvault_core::types::RuleId;
use famvault_entity::member::FamilyRole;
use famvault_entity::rule::ConditionLogic;
use famvault_service::rule::{CreateRuleRequest, ReorderRulesRequest, UpdateRuleRequest};
use famvault_service::RequestContext;
use famvault_store::RuleStore;
use serde_json::json;

use crate::helpers::TestVault;

async fn make_rule(vault: &TestVault, ctx: &RequestContext, name: &str) -> RuleId {
    vault
        .rule_service
        .create_rule(
            ctx,
            CreateRuleRequest {
                name: name.to_string(),
                conditions: json!([{"kind": "extension", "value": "jpg"}]),
                condition_logic: ConditionLogic::And,
                action: json!({"type": "apply_tags", "tag_ids": []}),
            },
        )
        .await
        .expect("create rule")
        .id
}

#[tokio::test]
async fn test_new_rules_append_to_the_priority_order() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    let first = make_rule(&vault, &owner, "first").await;
    let second = make_rule(&vault, &owner, "second").await;

    let rules = vault.rule_service.list_rules(&owner).await.expect("list");
    assert_eq!(rules.len(), 2);
    assert_eq!(rules[0].id, first);
    assert_eq!(rules[0].priority, 1);
    assert!(rules[0].enabled);
    assert_eq!(rules[1].id, second);
    assert_eq!(rules[1].priority, 2);
}

#[tokio::test]
async fn test_rule_mutations_require_the_admin_role() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let admin = vault.member(owner.family_id, FamilyRole::Admin).await;
    let member = vault.member(owner.family_id, FamilyRole::Member).await;

    let rule_id = make_rule(&vault, &admin, "by admin").await;

    let err = vault
        .rule_service
        .create_rule(
            &member,
            CreateRuleRequest {
                name: "by member".to_string(),
                conditions: json!([]),
                condition_logic: ConditionLogic::Or,
                action: json!({"type": "apply_tags", "tag_ids": []}),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = vault
        .rule_service
        .delete_rule(&member, rule_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // Reading is open to every member.
    let rules = vault.rule_service.list_rules(&member).await.expect("list");
    assert_eq!(rules.len(), 1);
    vault
        .rule_service
        .get_rule(&member, rule_id)
        .await
        .expect("get");
}

#[tokio::test]
async fn test_rule_payloads_are_validated() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    let err = vault
        .rule_service
        .create_rule(
            &owner,
            CreateRuleRequest {
                name: "bad conditions".to_string(),
                conditions: json!([{"kind": "wavelength", "value": "450nm"}]),
                condition_logic: ConditionLogic::And,
                action: json!({"type": "apply_tags", "tag_ids": []}),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .rule_service
        .create_rule(
            &owner,
            CreateRuleRequest {
                name: "bad action".to_string(),
                conditions: json!([]),
                condition_logic: ConditionLogic::And,
                action: json!({"type": "launch_rocket"}),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let rule_id = make_rule(&vault, &owner, "good").await;
    let err = vault
        .rule_service
        .update_rule(
            &owner,
            rule_id,
            UpdateRuleRequest {
                name: None,
                conditions: Some(json!("not an array")),
                condition_logic: None,
                action: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_update_rule_changes_only_whats_given() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let rule_id = make_rule(&vault, &owner, "before").await;

    let updated = vault
        .rule_service
        .update_rule(
            &owner,
            rule_id,
            UpdateRuleRequest {
                name: Some("after".to_string()),
                conditions: None,
                condition_logic: Some(ConditionLogic::Or),
                action: None,
            },
        )
        .await
        .expect("update");

    assert_eq!(updated.name, "after");
    assert_eq!(updated.condition_logic, ConditionLogic::Or);
    assert_eq!(updated.conditions, json!([{"kind": "extension", "value": "jpg"}]));
    assert_eq!(updated.priority, 1);
}

#[tokio::test]
async fn test_disabling_a_rule_hides_it_from_evaluation() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let rule_id = make_rule(&vault, &owner, "toggled").await;

    let disabled = vault
        .rule_service
        .set_enabled(&owner, rule_id, false)
        .await
        .expect("disable");
    assert!(!disabled.enabled);

    let enabled_rules = vault
        .rules
        .list_enabled_by_family(owner.family_id)
        .await
        .expect("list enabled");
    assert!(enabled_rules.is_empty());

    vault
        .rule_service
        .set_enabled(&owner, rule_id, true)
        .await
        .expect("enable");
    let enabled_rules = vault
        .rules
        .list_enabled_by_family(owner.family_id)
        .await
        .expect("list enabled");
    assert_eq!(enabled_rules.len(), 1);
}

#[tokio::test]
async fn test_reorder_renumbers_the_listed_rules() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    let r1 = make_rule(&vault, &owner, "r1").await;
    let r2 = make_rule(&vault, &owner, "r2").await;
    let r3 = make_rule(&vault, &owner, "r3").await;

    vault
        .rule_service
        .reorder_rules(
            &owner,
            ReorderRulesRequest {
                rule_ids: vec![r3, r1],
            },
        )
        .await
        .expect("reorder");

    let by_id = |rules: &[famvault_entity::rule::OrganizationRule], id: RuleId| {
        rules.iter().find(|r| r.id == id).expect("rule present").priority
    };
    let rules = vault.rule_service.list_rules(&owner).await.expect("list");
    assert_eq!(by_id(&rules, r3), 1);
    assert_eq!(by_id(&rules, r1), 2);
    // Rules left out of the reorder keep their old priority.
    assert_eq!(by_id(&rules, r2), 2);
}

#[tokio::test]
async fn test_reorder_rejects_bad_requests() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let r1 = make_rule(&vault, &owner, "r1").await;

    let err = vault
        .rule_service
        .reorder_rules(&owner, ReorderRulesRequest { rule_ids: vec![] })
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .rule_service
        .reorder_rules(
            &owner,
            ReorderRulesRequest {
                rule_ids: vec![r1, r1],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .rule_service
        .reorder_rules(
            &owner,
            ReorderRulesRequest {
                rule_ids: vec![r1, RuleId::new()],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // A stranger's rule id must not be renumbered through this family.
    let other_owner = vault.family().await;
    let foreign = make_rule(&vault, &other_owner, "foreign").await;
    let err = vault
        .rule_service
        .reorder_rules(
            &owner,
            ReorderRulesRequest {
                rule_ids: vec![r1, foreign],
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_delete_rule() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let rule_id = make_rule(&vault, &owner, "short lived").await;

    vault
        .rule_service
        .delete_rule(&owner, rule_id)
        .await
        .expect("delete");
    let err = vault
        .rule_service
        .get_rule(&owner, rule_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    // Rules are family scoped even by id.
    let other_owner = vault.family().await;
    let foreign = make_rule(&vault, &other_owner, "foreign").await;
    let err = vault
        .rule_service
        .delete_rule(&owner, foreign)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}
