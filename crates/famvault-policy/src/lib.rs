//! # famvault-policy
//!
//! Effective permission resolution for FamVault resources. The resolver
//! combines ownership and family-role bypasses, the restricted/unrestricted
//! distinction, and folder-chain inheritance for files into one decision.

pub mod resolver;

pub use resolver::{AccessDecision, PermissionResolver, PermissionSource};
