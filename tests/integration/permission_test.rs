//! Permission integration tests: grants restricting resources, ancestry
//! inheritance, and the owner/role bypasses, all exercised through the
//! service layer.

use famvault_core::error::ErrorKind;
use famvault_core::types::MemberId;
use famvault_entity::member::FamilyRole;
use famvault_entity::permission::{PermissionLevel, ResourceRef};
use famvault_service::folder::CreateFolderRequest;
use famvault_service::permission::SetGrantRequest;

use crate::helpers::TestVault;

#[tokio::test]
async fn test_granting_restricts_a_previously_open_folder() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let alice = vault.member(owner.family_id, FamilyRole::Member).await;
    let bob = vault.member(owner.family_id, FamilyRole::Member).await;

    let folder = vault.folder(&owner, "Taxes", None).await;

    // No grants yet: open to every member.
    vault
        .folder_service
        .get_folder(&bob, folder.id)
        .await
        .expect("unrestricted read");

    vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: alice.member_id,
                level: PermissionLevel::View,
            },
        )
        .await
        .expect("set grant");

    vault
        .folder_service
        .get_folder(&alice, folder.id)
        .await
        .expect("granted read");
    let err = vault
        .folder_service
        .get_folder(&bob, folder.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // View does not satisfy Edit.
    let err = vault
        .folder_service
        .create_folder(
            &alice,
            CreateFolderRequest {
                name: "Sub".to_string(),
                parent_id: Some(folder.id),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // Upsert raises the level in place.
    vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: alice.member_id,
                level: PermissionLevel::Edit,
            },
        )
        .await
        .expect("raise grant");
    vault
        .folder_service
        .create_folder(
            &alice,
            CreateFolderRequest {
                name: "Sub".to_string(),
                parent_id: Some(folder.id),
            },
        )
        .await
        .expect("edit after upgrade");

    let grants = vault
        .permission_service
        .list_grants(&owner, ResourceRef::Folder(folder.id))
        .await
        .expect("list grants");
    assert_eq!(grants.len(), 1);
    assert_eq!(grants[0].level, PermissionLevel::Edit);
}

#[tokio::test]
async fn test_owner_and_admin_roles_bypass_grants() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let admin = vault.member(owner.family_id, FamilyRole::Admin).await;
    let alice = vault.member(owner.family_id, FamilyRole::Member).await;

    let folder = vault.folder(&owner, "Locked", None).await;
    vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: alice.member_id,
                level: PermissionLevel::View,
            },
        )
        .await
        .expect("set grant");

    // Neither holds a grant, both pass on role alone.
    vault
        .folder_service
        .rename_folder(&admin, folder.id, "Admin was here")
        .await
        .expect("admin edit");
    vault
        .folder_service
        .rename_folder(&owner, folder.id, "Owner was here")
        .await
        .expect("owner edit");
}

#[tokio::test]
async fn test_creators_keep_control_of_their_own_resources() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let alice = vault.member(owner.family_id, FamilyRole::Member).await;
    let bob = vault.member(owner.family_id, FamilyRole::Member).await;

    let folder = vault.folder(&alice, "Alices corner", None).await;
    vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: bob.member_id,
                level: PermissionLevel::View,
            },
        )
        .await
        .expect("set grant");

    // Alice holds no grant, but created the folder.
    vault
        .folder_service
        .rename_folder(&alice, folder.id, "Still hers")
        .await
        .expect("creator edit");
    vault
        .folder_service
        .delete_folder(&alice, folder.id)
        .await
        .expect("creator delete");
}

#[tokio::test]
async fn test_files_inherit_restrictions_from_their_folder() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let alice = vault.member(owner.family_id, FamilyRole::Member).await;
    let bob = vault.member(owner.family_id, FamilyRole::Member).await;

    let folder = vault.folder(&owner, "Medical", None).await;
    let file = vault
        .upload(&owner, "results.pdf", Some("application/pdf"), 100, Some(folder.id))
        .await;

    vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: alice.member_id,
                level: PermissionLevel::View,
            },
        )
        .await
        .expect("set grant");

    // The file carries no grant of its own; the folder's decides.
    vault
        .file_service
        .get_file(&alice, file.id)
        .await
        .expect("inherited view");
    let err = vault
        .file_service
        .rename_file(&alice, file.id, "renamed.pdf")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
    let err = vault.file_service.get_file(&bob, file.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_managing_grants_needs_manage_on_the_resource() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let alice = vault.member(owner.family_id, FamilyRole::Member).await;
    let bob = vault.member(owner.family_id, FamilyRole::Member).await;

    let folder = vault.folder(&owner, "Guarded", None).await;
    vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: alice.member_id,
                level: PermissionLevel::Edit,
            },
        )
        .await
        .expect("set grant");

    // Edit is not Manage.
    let err = vault
        .permission_service
        .set_grant(
            &alice,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: bob.member_id,
                level: PermissionLevel::View,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_grants_only_target_family_members() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let other_owner = vault.family().await;
    let folder = vault.folder(&owner, "Shared", None).await;

    let err = vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: MemberId::new(),
                level: PermissionLevel::View,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    // Membership in another family does not count.
    let err = vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: other_owner.member_id,
                level: PermissionLevel::View,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_removing_a_grant_reopens_the_resource() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let alice = vault.member(owner.family_id, FamilyRole::Member).await;
    let bob = vault.member(owner.family_id, FamilyRole::Member).await;

    let folder = vault.folder(&owner, "Temporary", None).await;
    vault
        .permission_service
        .set_grant(
            &owner,
            ResourceRef::Folder(folder.id),
            SetGrantRequest {
                member_id: alice.member_id,
                level: PermissionLevel::View,
            },
        )
        .await
        .expect("set grant");
    let err = vault
        .folder_service
        .get_folder(&bob, folder.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    vault
        .permission_service
        .remove_grant(&owner, ResourceRef::Folder(folder.id), alice.member_id)
        .await
        .expect("remove grant");

    // Last grant gone, the folder is unrestricted again.
    vault
        .folder_service
        .get_folder(&bob, folder.id)
        .await
        .expect("open again");

    let err = vault
        .permission_service
        .remove_grant(&owner, ResourceRef::Folder(folder.id), alice.member_id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_is_restricted_tracks_grant_rows() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let alice = vault.member(owner.family_id, FamilyRole::Member).await;
    let folder = vault.folder(&owner, "Badge", None).await;
    let resource = ResourceRef::Folder(folder.id);

    assert!(!vault
        .permission_service
        .is_restricted(&owner, resource)
        .await
        .expect("check"));

    vault
        .permission_service
        .set_grant(
            &owner,
            resource,
            SetGrantRequest {
                member_id: alice.member_id,
                level: PermissionLevel::Manage,
            },
        )
        .await
        .expect("set grant");
    assert!(vault
        .permission_service
        .is_restricted(&owner, resource)
        .await
        .expect("check"));

    vault
        .permission_service
        .remove_grant(&owner, resource, alice.member_id)
        .await
        .expect("remove grant");
    assert!(!vault
        .permission_service
        .is_restricted(&owner, resource)
        .await
        .expect("check"));
}
