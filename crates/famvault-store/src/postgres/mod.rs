//! PostgreSQL store implementations.

pub mod album;
pub mod file;
pub mod folder;
pub mod membership;
pub mod permission;
pub mod processing;
pub mod rule;
pub mod tag;

pub use album::PgAlbumStore;
pub use file::PgFileStore;
pub use folder::PgFolderStore;
pub use membership::PgMembershipStore;
pub use permission::PgPermissionStore;
pub use processing::PgProcessingLogStore;
pub use rule::PgRuleStore;
pub use tag::PgTagStore;
