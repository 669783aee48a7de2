//! Stored file domain entities.

pub mod model;

pub use model::StoredFile;
