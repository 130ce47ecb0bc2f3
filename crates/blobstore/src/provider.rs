//! The `BlobStore` trait defines the interface for every object store
//! backend (filesystem, HTTP object store, in-memory).

use async_trait::async_trait;
use af_domain::error::Result;

/// Key/value blob storage with existence checks.
///
/// Keys are `/`-separated paths such as `info/u1_history.txt`. A missing
/// key is a normal outcome (`Ok(false)` / `Ok(None)`), never an error.
/// Any other backend failure is returned as `Err` and must not be
/// swallowed by callers.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Whether a blob exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Fetch the blob at `key`, or `None` when absent.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `body` at `key`, fully replacing any previous blob. The write
    /// is visible to every later `get`.
    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()>;

    /// Short backend name for logs and trace events.
    fn backend(&self) -> &'static str;
}

/// Content type for a key, inferred from its extension.
pub fn content_type_for(key: &str) -> &'static str {
    let ext = key.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "json" => "application/json; charset=UTF-8",
        "txt" => "text/plain; charset=UTF-8",
        "html" | "htm" => "text/html; charset=UTF-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        _ => "application/octet-stream",
    }
}
