//! In-memory store backend.
//!
//! Every store holds a handle to one shared [`MemoryDb`], mirroring how
//! the PostgreSQL stores share one connection pool. Multi-table cascades
//! take a single write lock, so they are as atomic as their SQL
//! counterparts' transactions.

pub mod album;
pub mod db;
pub mod file;
pub mod folder;
pub mod membership;
pub mod permission;
pub mod processing;
pub mod rule;
pub mod tag;

pub use album::MemoryAlbumStore;
pub use db::MemoryDb;
pub use file::MemoryFileStore;
pub use folder::MemoryFolderStore;
pub use membership::MemoryMembershipStore;
pub use permission::MemoryPermissionStore;
pub use processing::MemoryProcessingLogStore;
pub use rule::MemoryRuleStore;
pub use tag::MemoryTagStore;
