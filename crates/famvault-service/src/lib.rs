//! # famvault-service
//!
//! Business logic service layer for FamVault. Each service orchestrates
//! stores, blob storage, and the permission policy to implement one
//! application-level concern: the folder hierarchy, file metadata,
//! permission grants, organization rules, tags, albums, and the inbox
//! processing pipeline that ties them together.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod album;
pub mod context;
pub mod file;
pub mod folder;
pub mod organize;
pub mod permission;
pub mod rule;
pub mod tag;

pub use album::AlbumService;
pub use context::RequestContext;
pub use file::FileService;
pub use folder::{CascadeSummary, FamilyLocks, FolderService};
pub use organize::{InboxProcessor, InboxReport};
pub use permission::PermissionService;
pub use rule::{RuleMatch, RuleService};
pub use tag::TagService;
