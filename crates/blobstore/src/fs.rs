//! Local filesystem backend. Blobs live at `<root>/<bucket>/<key>`.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use af_domain::config::StoreConfig;
use af_domain::error::{Error, Result};
use af_domain::trace::TraceEvent;
use uuid::Uuid;

use crate::provider::BlobStore;

#[derive(Debug, Clone)]
pub struct FsBlobStore {
    dir: PathBuf,
}

impl FsBlobStore {
    pub fn new(cfg: &StoreConfig) -> Self {
        Self::at(cfg.root.join(&cfg.bucket))
    }

    /// Store rooted directly at `dir`.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve a key to a path inside the store directory. Keys that would
    /// escape it (`..`, absolute paths) are rejected.
    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let rel = Path::new(key.trim_start_matches('/'));
        let clean = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if key.trim().is_empty() || !clean {
            return Err(Error::Store {
                key: key.to_owned(),
                message: "invalid key".into(),
            });
        }
        Ok(self.dir.join(rel))
    }

    fn trace(&self, op: &str, key: &str, status: u16, start: Instant) {
        TraceEvent::BlobStoreCall {
            backend: self.backend().to_owned(),
            op: op.to_owned(),
            key: key.to_owned(),
            status,
            duration_ms: start.elapsed().as_millis() as u64,
        }
        .emit();
    }
}

fn io_failure(key: &str, e: std::io::Error) -> Error {
    Error::Store {
        key: key.to_owned(),
        message: e.to_string(),
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let start = Instant::now();
        let path = self.path_for(key)?;
        let found = match tokio::fs::metadata(&path).await {
            Ok(meta) => meta.is_file(),
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => return Err(io_failure(key, e)),
        };
        self.trace("HEAD", key, if found { 200 } else { 404 }, start);
        Ok(found)
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let start = Instant::now();
        let path = self.path_for(key)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                self.trace("GET", key, 200, start);
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                self.trace("GET", key, 404, start);
                Ok(None)
            }
            Err(e) => Err(io_failure(key, e)),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let start = Instant::now();
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_failure(key, e))?;
        }

        // Write to a sibling temp file, then rename over the target so a
        // reader never sees a half-written blob.
        let tmp = path.with_extension(format!("tmp-{}", Uuid::new_v4().simple()));
        tokio::fs::write(&tmp, &body)
            .await
            .map_err(|e| io_failure(key, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_failure(key, e));
        }

        self.trace("PUT", key, 200, start);
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "fs"
    }
}
