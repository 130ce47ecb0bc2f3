//! `af-blobstore`: object storage for conversation history, profiles and
//! generated images.
//!
//! Provides the [`BlobStore`] trait and three backends:
//!
//! | Backend  | Implementation     | Best for                          |
//! |----------|--------------------|-----------------------------------|
//! | `fs`     | [`FsBlobStore`]     | Single host deployments (default) |
//! | `http`   | [`HttpBlobStore`]   | S3-compatible object stores       |
//! | `memory` | [`MemoryBlobStore`] | Tests                             |
//!
//! # Quick start
//!
//! ```rust,no_run
//! use af_domain::config::StoreConfig;
//! use af_blobstore::{create_store, BlobStore};
//!
//! # async fn example() -> af_domain::error::Result<()> {
//! let store = create_store(&StoreConfig::default())?;
//! if let Some(raw) = store.get("info/u1_history.txt").await? {
//!     println!("{} bytes of history", raw.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod fs;
pub mod memory;
pub mod provider;
pub mod rest;

// ── Re-exports for ergonomic imports ─────────────────────────────────

pub use fs::FsBlobStore;
pub use memory::MemoryBlobStore;
pub use provider::{content_type_for, BlobStore};
pub use rest::HttpBlobStore;

use std::sync::Arc;

use af_domain::config::{StoreBackend, StoreConfig};
use af_domain::error::Result;

/// Create the configured [`BlobStore`] backend.
///
/// A `memory` store starts empty and lives as long as the returned handle.
pub fn create_store(cfg: &StoreConfig) -> Result<Arc<dyn BlobStore>> {
    match cfg.backend {
        StoreBackend::Fs => {
            let store = FsBlobStore::new(cfg);
            tracing::info!(root = %cfg.root.display(), bucket = %cfg.bucket, "using filesystem blob store");
            Ok(Arc::new(store))
        }
        StoreBackend::Http => {
            let store = HttpBlobStore::new(cfg)?;
            tracing::info!(base_url = ?cfg.base_url, bucket = %cfg.bucket, "using http blob store");
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("using in-memory blob store; data is lost on exit");
            Ok(Arc::new(MemoryBlobStore::new()))
        }
    }
}
