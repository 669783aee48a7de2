//! Core type definitions used across the FamVault workspace.

pub mod id;

pub use id::*;
