//! Blob store trait for pluggable file content backends.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for blob content backends.
///
/// File metadata lives in the database; the bytes live behind this trait,
/// addressed by the opaque `storage_key` recorded on each file row. The
/// [`BlobStore`] trait is defined here in `famvault-core` and implemented
/// in `famvault-storage`.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the backend type name (e.g., "local", "memory").
    fn backend_type(&self) -> &str;

    /// Check whether the backend is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write the full contents of a blob at the given key.
    async fn write(&self, key: &str, data: &[u8]) -> AppResult<()>;

    /// Read a blob into memory as a complete byte vector.
    async fn read(&self, key: &str) -> AppResult<Vec<u8>>;

    /// Delete the blob at the given key.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a blob exists at the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;
}
