//! Tag and album integration tests: name uniqueness, idempotent
//! associations, and album cover bookkeeping.

use famvault_core::error::ErrorKind;
use famvault_core::types::{FileId, MemberId};
use famvault_entity::member::FamilyRole;
use famvault_entity::tag::Tag;
use famvault_service::album::CreateAlbumRequest;
use famvault_service::tag::CreateTagRequest;
use famvault_service::RequestContext;
use famvault_store::AlbumStore;

use crate::helpers::TestVault;

async fn tag(vault: &TestVault, ctx: &RequestContext, name: &str) -> Tag {
    vault
        .tag_service
        .create_tag(
            ctx,
            CreateTagRequest {
                name: name.to_string(),
                color: None,
            },
        )
        .await
        .expect("create tag")
}

#[tokio::test]
async fn test_tag_names_are_unique_per_family_case_insensitive() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    tag(&vault, &owner, "Vacation").await;
    let err = vault
        .tag_service
        .create_tag(
            &owner,
            CreateTagRequest {
                name: "vacation".to_string(),
                color: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    // The same name is fine in another family.
    let other_owner = vault.family().await;
    tag(&vault, &other_owner, "Vacation").await;
}

#[tokio::test]
async fn test_rename_tag_checks_the_new_name() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let summer = tag(&vault, &owner, "summer").await;
    tag(&vault, &owner, "winter").await;

    let renamed = vault
        .tag_service
        .rename_tag(&owner, summer.id, "spring")
        .await
        .expect("rename");
    assert_eq!(renamed.name, "spring");

    let err = vault
        .tag_service
        .rename_tag(&owner, summer.id, "Winter")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Conflict);

    let err = vault
        .tag_service
        .rename_tag(&owner, summer.id, "  ")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_tagging_is_idempotent() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let pets = tag(&vault, &owner, "pets").await;
    let file = vault.upload(&owner, "dog.jpg", None, 1, None).await;

    assert!(vault
        .tag_service
        .tag_file(&owner, file.id, pets.id)
        .await
        .expect("tag"));
    assert!(!vault
        .tag_service
        .tag_file(&owner, file.id, pets.id)
        .await
        .expect("tag again"));

    let tags = vault
        .tag_service
        .list_file_tags(&owner, file.id)
        .await
        .expect("list");
    assert_eq!(tags.len(), 1);

    assert!(vault
        .tag_service
        .untag_file(&owner, file.id, pets.id)
        .await
        .expect("untag"));
    assert!(!vault
        .tag_service
        .untag_file(&owner, file.id, pets.id)
        .await
        .expect("untag again"));
}

#[tokio::test]
async fn test_deleting_a_tag_detaches_it_everywhere() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let old = tag(&vault, &owner, "old").await;
    let file = vault.upload(&owner, "keep.txt", None, 1, None).await;
    vault
        .tag_service
        .tag_file(&owner, file.id, old.id)
        .await
        .expect("tag");

    vault
        .tag_service
        .delete_tag(&owner, old.id)
        .await
        .expect("delete tag");

    let tags = vault
        .tag_service
        .list_file_tags(&owner, file.id)
        .await
        .expect("list");
    assert!(tags.is_empty());
    // The file is untouched.
    vault
        .file_service
        .get_file(&owner, file.id)
        .await
        .expect("file still there");
}

#[tokio::test]
async fn test_tags_are_family_scoped() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let other_owner = vault.family().await;
    let private = tag(&vault, &owner, "private").await;

    let err = vault
        .tag_service
        .rename_tag(&other_owner, private.id, "mine now")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // A non-member cannot create tags at all.
    let outsider = RequestContext::new(MemberId::new(), owner.family_id);
    let err = vault
        .tag_service
        .create_tag(
            &outsider,
            CreateTagRequest {
                name: "sneaky".to_string(),
                color: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_album_crud() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let member = vault.member(owner.family_id, FamilyRole::Member).await;

    let album = vault
        .album_service
        .create_album(
            &member,
            CreateAlbumRequest {
                name: "Summer 2026".to_string(),
            },
        )
        .await
        .expect("create album");
    assert_eq!(album.cover_file_id, None);

    let renamed = vault
        .album_service
        .rename_album(&owner, album.id, "Summer trip")
        .await
        .expect("rename");
    assert_eq!(renamed.name, "Summer trip");

    let albums = vault.album_service.list_albums(&member).await.expect("list");
    assert_eq!(albums.len(), 1);

    vault
        .album_service
        .delete_album(&owner, album.id)
        .await
        .expect("delete");
    let albums = vault.album_service.list_albums(&member).await.expect("list");
    assert!(albums.is_empty());
}

#[tokio::test]
async fn test_first_added_file_becomes_the_cover() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let album = vault
        .album_service
        .create_album(
            &owner,
            CreateAlbumRequest {
                name: "Covers".to_string(),
            },
        )
        .await
        .expect("create album");
    let f1 = vault.upload(&owner, "one.jpg", None, 1, None).await;
    let f2 = vault.upload(&owner, "two.jpg", None, 1, None).await;
    let f3 = vault.upload(&owner, "three.jpg", None, 1, None).await;

    assert!(vault
        .album_service
        .add_file(&owner, album.id, f1.id)
        .await
        .expect("add f1"));
    assert!(vault
        .album_service
        .add_file(&owner, album.id, f2.id)
        .await
        .expect("add f2"));

    let current = vault
        .albums
        .find_by_id(album.id)
        .await
        .expect("find album")
        .expect("album exists");
    assert_eq!(current.cover_file_id, Some(f1.id));

    // Removing the cover clears it; it is not silently reassigned.
    assert!(vault
        .album_service
        .remove_file(&owner, album.id, f1.id)
        .await
        .expect("remove f1"));
    let current = vault
        .albums
        .find_by_id(album.id)
        .await
        .expect("find album")
        .expect("album exists");
    assert_eq!(current.cover_file_id, None);

    // The next addition to a coverless album takes the slot.
    assert!(vault
        .album_service
        .add_file(&owner, album.id, f3.id)
        .await
        .expect("add f3"));
    let current = vault
        .albums
        .find_by_id(album.id)
        .await
        .expect("find album")
        .expect("album exists");
    assert_eq!(current.cover_file_id, Some(f3.id));
}

#[tokio::test]
async fn test_album_membership_is_idempotent_and_ordered() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let album = vault
        .album_service
        .create_album(
            &owner,
            CreateAlbumRequest {
                name: "Ordered".to_string(),
            },
        )
        .await
        .expect("create album");
    let early = vault.upload(&owner, "early.jpg", None, 1, None).await;
    let late = vault.upload(&owner, "late.jpg", None, 1, None).await;

    assert!(vault
        .album_service
        .add_file(&owner, album.id, early.id)
        .await
        .expect("add"));
    assert!(!vault
        .album_service
        .add_file(&owner, album.id, early.id)
        .await
        .expect("add again"));
    assert!(vault
        .album_service
        .add_file(&owner, album.id, late.id)
        .await
        .expect("add"));

    let files = vault
        .album_service
        .list_album_files(&owner, album.id)
        .await
        .expect("list");
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].id, early.id);
    assert_eq!(files[1].id, late.id);

    assert!(!vault
        .album_service
        .remove_file(&owner, album.id, FileId::new())
        .await
        .expect("remove unknown"));
}

#[tokio::test]
async fn test_deleting_an_album_keeps_its_files() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let album = vault
        .album_service
        .create_album(
            &owner,
            CreateAlbumRequest {
                name: "Ephemeral".to_string(),
            },
        )
        .await
        .expect("create album");
    let file = vault.upload(&owner, "survives.jpg", None, 1, None).await;
    vault
        .album_service
        .add_file(&owner, album.id, file.id)
        .await
        .expect("add");

    vault
        .album_service
        .delete_album(&owner, album.id)
        .await
        .expect("delete album");

    vault
        .file_service
        .get_file(&owner, file.id)
        .await
        .expect("file survives");
}
