//! File metadata integration tests: upload registration, moves, renames,
//! and deletion.

use famvault_core::error::ErrorKind;
use famvault_core::traits::storage::BlobStore;
use famvault_core::types::{FileId, FolderId};
use famvault_entity::folder::FolderKind;
use famvault_service::file::{MoveFileRequest, RegisterUploadRequest};
use famvault_store::{FileStore, FolderStore};

use crate::helpers::TestVault;

#[tokio::test]
async fn test_upload_without_destination_lands_in_the_inbox() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    let file = vault
        .upload(&owner, "receipt.pdf", Some("application/pdf"), 2048, None)
        .await;

    let inbox = vault
        .folders
        .find_inbox(owner.family_id)
        .await
        .expect("find inbox")
        .expect("inbox bootstrapped");
    assert_eq!(inbox.kind, FolderKind::Inbox);
    assert_eq!(file.folder_id, inbox.id);
    assert_eq!(file.uploaded_by, owner.member_id);

    // The bootstrap built the Root too.
    let root = vault
        .folders
        .find_root(owner.family_id)
        .await
        .expect("find root")
        .expect("root bootstrapped");
    assert_eq!(inbox.parent_id, Some(root.id));
}

#[tokio::test]
async fn test_upload_into_an_explicit_folder() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let folder = vault.folder(&owner, "Scans", None).await;

    let file = vault
        .upload(&owner, "scan.png", Some("image/png"), 512, Some(folder.id))
        .await;
    assert_eq!(file.folder_id, folder.id);

    let listed = vault
        .file_service
        .list_folder_files(&owner, folder.id)
        .await
        .expect("list files");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, file.id);
}

#[tokio::test]
async fn test_upload_validates_the_request() {
    let vault = TestVault::new();
    let owner = vault.family().await;

    let err = vault
        .file_service
        .register_upload(
            &owner,
            RegisterUploadRequest {
                name: "   ".to_string(),
                folder_id: None,
                mime_type: None,
                size_bytes: 10,
                storage_key: "k".to_string(),
                checksum_sha256: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .file_service
        .register_upload(
            &owner,
            RegisterUploadRequest {
                name: "negative.bin".to_string(),
                folder_id: None,
                mime_type: None,
                size_bytes: -1,
                storage_key: "k".to_string(),
                checksum_sha256: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let err = vault
        .file_service
        .register_upload(
            &owner,
            RegisterUploadRequest {
                name: "orphan.txt".to_string(),
                folder_id: Some(FolderId::new()),
                mime_type: None,
                size_bytes: 1,
                storage_key: "k".to_string(),
                checksum_sha256: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_move_file_between_folders() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let from = vault.folder(&owner, "From", None).await;
    let to = vault.folder(&owner, "To", None).await;
    let file = vault.upload(&owner, "move.me", None, 1, Some(from.id)).await;

    let moved = vault
        .file_service
        .move_file(
            &owner,
            file.id,
            MoveFileRequest {
                target_folder_id: to.id,
            },
        )
        .await
        .expect("move file");
    assert_eq!(moved.folder_id, to.id);

    let err = vault
        .file_service
        .move_file(
            &owner,
            file.id,
            MoveFileRequest {
                target_folder_id: FolderId::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let other_owner = vault.family().await;
    let foreign = vault.folder(&other_owner, "Foreign", None).await;
    let err = vault
        .file_service
        .move_file(
            &owner,
            file.id,
            MoveFileRequest {
                target_folder_id: foreign.id,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
async fn test_rename_file() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let file = vault.upload(&owner, "old.txt", None, 1, None).await;

    let renamed = vault
        .file_service
        .rename_file(&owner, file.id, "new.txt")
        .await
        .expect("rename");
    assert_eq!(renamed.name, "new.txt");

    let err = vault
        .file_service
        .rename_file(&owner, file.id, "")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn test_delete_file_removes_metadata_and_blob() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let file = vault.upload(&owner, "gone.bin", None, 4, None).await;
    vault
        .blobs
        .write(&file.storage_key, b"data")
        .await
        .expect("write blob");

    vault
        .file_service
        .delete_file(&owner, file.id)
        .await
        .expect("delete");

    assert!(vault
        .files
        .find_by_id(file.id)
        .await
        .expect("find file")
        .is_none());
    assert!(!vault
        .blobs
        .exists(&file.storage_key)
        .await
        .expect("blob exists"));

    let err = vault
        .file_service
        .get_file(&owner, file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn test_files_are_family_scoped() {
    let vault = TestVault::new();
    let owner = vault.family().await;
    let other_owner = vault.family().await;
    let file = vault.upload(&owner, "private.txt", None, 1, None).await;

    let err = vault
        .file_service
        .get_file(&other_owner, file.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    let err = vault
        .file_service
        .get_file(&owner, FileId::new())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
