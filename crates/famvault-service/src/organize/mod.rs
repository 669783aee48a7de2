//! Inbox sweep orchestration.

pub mod processor;

pub use processor::{InboxProcessor, InboxReport};
