//! Tag management and file/tag associations.

pub mod service;

pub use service::{CreateTagRequest, TagService};
