//! # famvault-storage
//!
//! Blob storage backends for FamVault. The metadata layer refers to
//! blobs by opaque storage keys; this crate maps those keys onto an
//! actual backend.

use std::sync::Arc;

use famvault_core::config::StorageConfig;
use famvault_core::error::AppError;
use famvault_core::result::AppResult;
use famvault_core::traits::storage::BlobStore;

pub mod local;
pub mod memory;

pub use local::LocalBlobStore;
pub use memory::MemoryBlobStore;

/// Open the blob store the configuration names.
pub async fn open_blob_store(config: &StorageConfig) -> AppResult<Arc<dyn BlobStore>> {
    match config.backend.as_str() {
        "local" => {
            let store = LocalBlobStore::new(&config.local.root_path).await?;
            Ok(Arc::new(store))
        }
        other => Err(AppError::configuration(format!(
            "Unknown storage backend: {other}"
        ))),
    }
}
