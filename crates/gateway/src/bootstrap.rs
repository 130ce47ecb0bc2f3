//! AppState construction shared by `serve`, `ask` and `invoke`.
//!
//! The config is validated once here and every client handle is created
//! from it; handlers receive them through [`AppState`].

use std::sync::Arc;

use anyhow::Context;

use af_blobstore::create_store;
use af_domain::config::{Config, ConfigSeverity};
use af_providers::{create_image_provider, create_llm_provider};

use crate::state::AppState;

/// Validate config, initialize every backend and return a fully-wired
/// [`AppState`].
pub fn build_app_state(config: Arc<Config>) -> anyhow::Result<AppState> {
    // ── Config validation ────────────────────────────────────────────
    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            ConfigSeverity::Warning => tracing::warn!("config: {issue}"),
            ConfigSeverity::Error => tracing::error!("config: {issue}"),
        }
    }
    let error_count = issues
        .iter()
        .filter(|i| i.severity == ConfigSeverity::Error)
        .count();
    if error_count > 0 {
        anyhow::bail!("config validation failed with {error_count} error(s)");
    }

    // ── Blob store ───────────────────────────────────────────────────
    let store = create_store(&config.store).context("creating blob store")?;
    tracing::info!(backend = store.backend(), "blob store ready");

    // ── LLM + image providers ────────────────────────────────────────
    let llm = create_llm_provider(&config.llm).context("initializing LLM provider")?;
    let images =
        create_image_provider(&config.llm, &config.image).context("initializing image provider")?;

    Ok(AppState::new(config, store, llm, images))
}
