//! Permission grant domain entities.

pub mod level;
pub mod model;

pub use level::PermissionLevel;
pub use model::{PermissionGrant, ResourceRef, ResourceType};
