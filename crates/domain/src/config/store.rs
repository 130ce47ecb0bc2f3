use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Blob store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    /// Root directory for the `fs` backend.
    #[serde(default = "d_root")]
    pub root: PathBuf,
    /// Namespace every key lives under (directory for `fs`, path segment
    /// for `http`).
    #[serde(default = "d_bucket")]
    pub bucket: String,
    /// Object store endpoint for the `http` backend, e.g.
    /// `http://localhost:9000`.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Environment variable holding an optional `X-Api-Key` for `http`.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "d_8000")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Fs,
    Http,
    Memory,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::Fs,
            root: d_root(),
            bucket: d_bucket(),
            base_url: None,
            api_key_env: None,
            timeout_ms: 8000,
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_root() -> PathBuf {
    PathBuf::from("./data")
}
fn d_bucket() -> String {
    "my-ai-friend-bucket".into()
}
fn d_8000() -> u64 {
    8000
}
