//! Folder domain entities.

pub mod kind;
pub mod model;
pub mod path;
pub mod tree;

pub use kind::FolderKind;
pub use model::Folder;
pub use tree::{FolderNode, FolderTree};
