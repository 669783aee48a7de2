//! Tag store trait.

use async_trait::async_trait;

use famvault_core::result::AppResult;
use famvault_core::types::{FamilyId, FileId, TagId};
use famvault_entity::tag::Tag;

/// Persistence operations for tags and file/tag associations.
#[async_trait]
pub trait TagStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert a tag. Fails with a conflict when the name is already used
    /// in the family (case-insensitive).
    async fn insert(&self, tag: &Tag) -> AppResult<()>;

    /// Find a tag by ID.
    async fn find_by_id(&self, id: TagId) -> AppResult<Option<Tag>>;

    /// Find a tag by name (case-insensitive) within a family.
    async fn find_by_name(&self, family_id: FamilyId, name: &str) -> AppResult<Option<Tag>>;

    /// List all tags of a family, ordered by name.
    async fn list_by_family(&self, family_id: FamilyId) -> AppResult<Vec<Tag>>;

    /// Fetch the subset of the given tag ids that exist.
    async fn list_by_ids(&self, ids: &[TagId]) -> AppResult<Vec<Tag>>;

    /// Rename a tag. Fails with a conflict when the name is taken.
    async fn rename(&self, id: TagId, new_name: &str) -> AppResult<Tag>;

    /// Delete a tag and its file associations. Returns `false` when it
    /// was already gone.
    async fn remove(&self, id: TagId) -> AppResult<bool>;

    /// Associate a tag with a file. Idempotent; returns `true` only when
    /// the association was newly created.
    async fn attach(&self, file_id: FileId, tag_id: TagId) -> AppResult<bool>;

    /// Remove a file/tag association. Idempotent; returns `true` only
    /// when an association was actually removed.
    async fn detach(&self, file_id: FileId, tag_id: TagId) -> AppResult<bool>;

    /// List the tags attached to a file, ordered by name.
    async fn list_for_file(&self, file_id: FileId) -> AppResult<Vec<Tag>>;
}
