//! Inbox processing log domain entities.

pub mod model;

pub use model::ProcessingLogEntry;
