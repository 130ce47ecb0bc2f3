//! HTTP implementation of [`BlobStore`].
//!
//! `HttpBlobStore` speaks the path-style object API shared by S3-compatible
//! servers: `HEAD`, `GET` and `PUT` on `<base_url>/<bucket>/<key>`. A 404 is
//! the not-found outcome; every other failure is returned to the caller
//! without retrying.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use af_domain::config::StoreConfig;
use af_domain::error::{from_reqwest, Error, Result};
use af_domain::trace::TraceEvent;
use uuid::Uuid;

use crate::provider::{content_type_for, BlobStore};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Client
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A REST client for an S3-compatible object store.
///
/// Created once at startup and shared; the underlying `reqwest::Client`
/// keeps a connection pool.
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    http: Client,
    base_url: String,
    bucket: String,
    api_key: Option<String>,
}

impl HttpBlobStore {
    /// Build a new client from the shared `StoreConfig`.
    pub fn new(cfg: &StoreConfig) -> Result<Self> {
        let base_url = cfg
            .base_url
            .as_deref()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::Config("store.base_url is required for the http backend".into()))?
            .trim_end_matches('/')
            .to_owned();

        let http = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;

        let api_key = cfg
            .api_key_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok())
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            http,
            base_url,
            bucket: cfg.bucket.trim_matches('/').to_owned(),
            api_key,
        })
    }

    // ── request helpers ──────────────────────────────────────────────

    /// Full object URL for `key`.
    fn url(&self, key: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.bucket, key.trim_start_matches('/'))
    }

    fn decorate(&self, rb: RequestBuilder) -> RequestBuilder {
        let rb = rb.header("X-Trace-Id", Uuid::new_v4().to_string());
        match self.api_key {
            Some(ref key) => rb.header("X-Api-Key", key),
            None => rb,
        }
    }

    /// Send one request and record a `BlobStoreCall` trace event.
    ///
    /// Returns the response for any HTTP status; transport failures are
    /// mapped through [`from_reqwest`].
    async fn send(&self, op: &str, key: &str, rb: RequestBuilder) -> Result<Response> {
        let start = Instant::now();
        let result = self.decorate(rb).send().await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let status = match &result {
            Ok(resp) => resp.status().as_u16(),
            Err(e) => e.status().map(|s| s.as_u16()).unwrap_or(0),
        };
        TraceEvent::BlobStoreCall {
            backend: self.backend().to_owned(),
            op: op.to_owned(),
            key: key.to_owned(),
            status,
            duration_ms,
        }
        .emit();

        result.map_err(from_reqwest)
    }

    async fn failure(&self, op: &str, key: &str, resp: Response) -> Error {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Error::Auth(format!("{op} {key} rejected ({status}): {body}"));
        }
        Error::Store {
            key: key.to_owned(),
            message: format!("{op} returned {status}: {body}"),
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Trait implementation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn exists(&self, key: &str) -> Result<bool> {
        let resp = self.send("HEAD", key, self.http.head(self.url(key))).await?;
        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => Err(self.failure("HEAD", key, resp).await),
        }
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let resp = self.send("GET", key, self.http.get(self.url(key))).await?;
        match resp.status() {
            s if s.is_success() => {
                let bytes = resp.bytes().await.map_err(from_reqwest)?;
                Ok(Some(bytes.to_vec()))
            }
            StatusCode::NOT_FOUND => Ok(None),
            _ => Err(self.failure("GET", key, resp).await),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>) -> Result<()> {
        let rb = self
            .http
            .put(self.url(key))
            .header("Content-Type", content_type_for(key))
            .body(body);
        let resp = self.send("PUT", key, rb).await?;
        if resp.status().is_success() {
            Ok(())
        } else {
            Err(self.failure("PUT", key, resp).await)
        }
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}

