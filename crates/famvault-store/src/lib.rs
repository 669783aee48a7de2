//! # famvault-store
//!
//! Persistence layer for FamVault: object-safe store traits, the
//! PostgreSQL implementations used in production, and in-memory
//! implementations backing the test suites.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod postgres;
pub mod traits;

pub use connection::DatabasePool;
pub use traits::{
    AlbumStore, FileStore, FolderStore, MembershipStore, PermissionStore, ProcessingLogStore,
    RuleStore, TagStore,
};
