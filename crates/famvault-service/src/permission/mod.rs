//! Permission grant administration.

pub mod service;

pub use service::{PermissionService, SetGrantRequest};
