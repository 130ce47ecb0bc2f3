pub mod bedrock;
pub mod invoker;
pub mod region;
pub mod traits;
pub mod util;

// Re-exports for convenience.
pub use bedrock::{BedrockImageProvider, BedrockProvider};
pub use invoker::LlmInvoker;
pub use region::{FixedRegionSelector, RegionSelector, UniformRegionSelector};
pub use traits::{
    Completion, CompletionRequest, GeneratedImage, ImageProvider, ImageRequest, LlmProvider, Usage,
};

use std::sync::Arc;

use af_domain::config::{ImageConfig, LlmConfig};
use af_domain::error::Result;

/// Build the text-completion provider from config.
pub fn create_llm_provider(cfg: &LlmConfig) -> Result<Arc<dyn LlmProvider>> {
    let provider = BedrockProvider::from_config(cfg)?;
    tracing::info!(
        model = %cfg.model_id,
        regions = ?cfg.regions,
        "bedrock text provider ready"
    );
    Ok(Arc::new(provider))
}

/// Build the image provider. Shares the endpoint and credentials of the
/// text provider.
pub fn create_image_provider(llm: &LlmConfig, image: &ImageConfig) -> Result<Arc<dyn ImageProvider>> {
    let provider = BedrockImageProvider::from_config(llm, image)?;
    tracing::info!(model = %image.model_id, region = %image.region, "bedrock image provider ready");
    Ok(Arc::new(provider))
}
