//! # famvault-entity
//!
//! Domain entity models for FamVault. Every struct in this crate
//! represents a database table row or a domain value object. All entities
//! derive `Debug`, `Clone`, `Serialize`, `Deserialize`, and database
//! entities additionally derive `sqlx::FromRow`.

pub mod album;
pub mod file;
pub mod folder;
pub mod member;
pub mod permission;
pub mod processing;
pub mod rule;
pub mod tag;
