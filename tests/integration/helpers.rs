//! Shared test helpers for integration tests.

use std::sync::Arc;

use chrono::Utc;

use famvault_core::types::{FamilyId, FolderId, MemberId};
use famvault_entity::file::StoredFile;
use famvault_entity::folder::Folder;
use famvault_entity::member::{FamilyMember, FamilyRole};
use famvault_policy::PermissionResolver;
use famvault_service::file::RegisterUploadRequest;
use famvault_service::folder::CreateFolderRequest;
use famvault_service::{
    AlbumService, FamilyLocks, FileService, FolderService, InboxProcessor, PermissionService,
    RequestContext, RuleService, TagService,
};
use famvault_storage::MemoryBlobStore;
use famvault_store::memory::{
    MemoryAlbumStore, MemoryDb, MemoryFileStore, MemoryFolderStore, MemoryMembershipStore,
    MemoryPermissionStore, MemoryProcessingLogStore, MemoryRuleStore, MemoryTagStore,
};
use famvault_store::MembershipStore;
use famvault_worker::InboxSweeper;

/// The whole service graph wired over one shared in-memory database.
///
/// Stores are exposed alongside the services so tests can seed state
/// below the service layer and assert on rows the services do not
/// surface directly.
pub struct TestVault {
    pub folders: Arc<MemoryFolderStore>,
    pub files: Arc<MemoryFileStore>,
    pub grants: Arc<MemoryPermissionStore>,
    pub memberships: Arc<MemoryMembershipStore>,
    pub rules: Arc<MemoryRuleStore>,
    pub tags: Arc<MemoryTagStore>,
    pub albums: Arc<MemoryAlbumStore>,
    pub log: Arc<MemoryProcessingLogStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub locks: Arc<FamilyLocks>,
    pub folder_service: Arc<FolderService>,
    pub file_service: Arc<FileService>,
    pub permission_service: PermissionService,
    pub rule_service: RuleService,
    pub tag_service: TagService,
    pub album_service: AlbumService,
    pub processor: Arc<InboxProcessor>,
    pub sweeper: InboxSweeper,
}

impl TestVault {
    pub fn new() -> Self {
        let db = MemoryDb::new();
        let folders = Arc::new(MemoryFolderStore::new(db.clone()));
        let files = Arc::new(MemoryFileStore::new(db.clone()));
        let grants = Arc::new(MemoryPermissionStore::new(db.clone()));
        let memberships = Arc::new(MemoryMembershipStore::new(db.clone()));
        let rules = Arc::new(MemoryRuleStore::new(db.clone()));
        let tags = Arc::new(MemoryTagStore::new(db.clone()));
        let albums = Arc::new(MemoryAlbumStore::new(db.clone()));
        let log = Arc::new(MemoryProcessingLogStore::new(db));
        let blobs = Arc::new(MemoryBlobStore::new());
        let locks = Arc::new(FamilyLocks::new());

        let resolver = Arc::new(PermissionResolver::new(
            folders.clone(),
            files.clone(),
            grants.clone(),
            memberships.clone(),
        ));

        let folder_service = Arc::new(FolderService::new(
            folders.clone(),
            files.clone(),
            blobs.clone(),
            resolver.clone(),
            locks.clone(),
        ));
        let file_service = Arc::new(FileService::new(
            files.clone(),
            folders.clone(),
            blobs.clone(),
            resolver.clone(),
            folder_service.clone(),
        ));
        let permission_service =
            PermissionService::new(grants.clone(), memberships.clone(), resolver.clone());
        let rule_service = RuleService::new(rules.clone(), memberships.clone());
        let tag_service = TagService::new(
            tags.clone(),
            files.clone(),
            memberships.clone(),
            resolver.clone(),
        );
        let album_service = AlbumService::new(
            albums.clone(),
            files.clone(),
            memberships.clone(),
            resolver.clone(),
        );
        let processor = Arc::new(InboxProcessor::new(
            folders.clone(),
            files.clone(),
            rules.clone(),
            tags.clone(),
            log.clone(),
            locks.clone(),
        ));
        let sweeper = InboxSweeper::new(files.clone(), processor.clone());

        Self {
            folders,
            files,
            grants,
            memberships,
            rules,
            tags,
            albums,
            log,
            blobs,
            locks,
            folder_service,
            file_service,
            permission_service,
            rule_service,
            tag_service,
            album_service,
            processor,
            sweeper,
        }
    }

    /// Adds a member to the family and returns a context acting as them.
    pub async fn member(&self, family_id: FamilyId, role: FamilyRole) -> RequestContext {
        let member_id = MemberId::new();
        self.memberships
            .upsert(&FamilyMember {
                member_id,
                family_id,
                display_name: format!("member-{member_id}"),
                role,
                joined_at: Utc::now(),
            })
            .await
            .expect("upsert member");
        RequestContext::new(member_id, family_id)
    }

    /// Fresh family with its owner. Returns the owner's context.
    pub async fn family(&self) -> RequestContext {
        self.member(FamilyId::new(), FamilyRole::Owner).await
    }

    /// Creates a folder through the service layer.
    pub async fn folder(
        &self,
        ctx: &RequestContext,
        name: &str,
        parent_id: Option<FolderId>,
    ) -> Folder {
        self.folder_service
            .create_folder(
                ctx,
                CreateFolderRequest {
                    name: name.to_string(),
                    parent_id,
                },
            )
            .await
            .expect("create folder")
    }

    /// Registers an upload through the service layer. `folder_id: None`
    /// lands the file in the family Inbox.
    pub async fn upload(
        &self,
        ctx: &RequestContext,
        name: &str,
        mime_type: Option<&str>,
        size_bytes: i64,
        folder_id: Option<FolderId>,
    ) -> StoredFile {
        self.file_service
            .register_upload(
                ctx,
                RegisterUploadRequest {
                    name: name.to_string(),
                    folder_id,
                    mime_type: mime_type.map(str::to_string),
                    size_bytes,
                    storage_key: format!("families/{}/{}", ctx.family_id, name),
                    checksum_sha256: None,
                },
            )
            .await
            .expect("register upload")
    }
}
