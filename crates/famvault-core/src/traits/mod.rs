//! Core traits defined in `famvault-core` and implemented by other crates.

pub mod storage;

pub use storage::BlobStore;
