//! `LlmInvoker`: region choice plus exactly one completion call.

use std::sync::Arc;

use af_domain::config::{DecodingConfig, LlmConfig};
use af_domain::error::Result;
use af_domain::trace::TraceEvent;

use crate::region::{RegionSelector, UniformRegionSelector};
use crate::traits::{CompletionRequest, LlmProvider};

/// Turns a prompt into an answer.
///
/// Per call: pick a region with the selector, send one request there, and
/// return its text. A failure is returned as-is; there is no second
/// attempt and no fallback answer.
#[derive(Clone)]
pub struct LlmInvoker {
    provider: Arc<dyn LlmProvider>,
    selector: Arc<dyn RegionSelector>,
    regions: Vec<String>,
}

impl LlmInvoker {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        selector: Arc<dyn RegionSelector>,
        regions: Vec<String>,
    ) -> Self {
        Self {
            provider,
            selector,
            regions,
        }
    }

    /// Invoker over `cfg.regions` with uniform random selection.
    pub fn from_config(provider: Arc<dyn LlmProvider>, cfg: &LlmConfig) -> Self {
        Self::new(provider, Arc::new(UniformRegionSelector), cfg.regions.clone())
    }

    pub fn with_selector(mut self, selector: Arc<dyn RegionSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub async fn invoke(&self, prompt: &str, params: &DecodingConfig) -> Result<String> {
        let region = self.selector.select(&self.regions)?.to_owned();
        TraceEvent::RegionSelected {
            region: region.clone(),
            candidates: self.regions.len(),
        }
        .emit();
        tracing::debug!(
            provider = %self.provider.provider_id(),
            model = %self.provider.model(),
            region = %region,
            "invoking llm"
        );

        let completion = self
            .provider
            .complete(CompletionRequest {
                region,
                prompt: prompt.to_owned(),
                params: params.clone(),
            })
            .await?;
        Ok(completion.content)
    }
}
