//! Object-safe store traits consumed by the service layer.
//!
//! Each trait has a PostgreSQL implementation (production) and an
//! in-memory implementation (tests). Methods that mutate several rows
//! must apply the whole batch atomically: one transaction in PostgreSQL,
//! one lock acquisition in memory.

pub mod album;
pub mod file;
pub mod folder;
pub mod membership;
pub mod permission;
pub mod processing;
pub mod rule;
pub mod tag;

pub use album::AlbumStore;
pub use file::FileStore;
pub use folder::FolderStore;
pub use membership::MembershipStore;
pub use permission::PermissionStore;
pub use processing::ProcessingLogStore;
pub use rule::RuleStore;
pub use tag::TagStore;
