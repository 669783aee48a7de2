//! Folder hierarchy management.

pub mod locks;
pub mod service;

pub use locks::FamilyLocks;
pub use service::{CascadeSummary, CreateFolderRequest, FolderService, MoveFolderRequest};
