use af_domain::config::DecodingConfig;
use af_domain::error::Result;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Request / Response types
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A single-message text completion request.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Region the call is sent to. Chosen before the call, never changed
    /// after a failure.
    pub region: String,
    /// The full prompt, sent as one user message.
    pub prompt: String,
    /// Decoding parameters, including the stop sequences.
    pub params: DecodingConfig,
}

/// Token usage reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completed text response.
#[derive(Debug, Clone)]
pub struct Completion {
    /// Concatenated text content. Never empty.
    pub content: String,
    pub usage: Option<Usage>,
    /// The model that actually produced the response.
    pub model: String,
    /// Why generation stopped (e.g. "end_turn", "stop_sequence").
    pub stop_reason: Option<String>,
}

/// A text-to-image request.
#[derive(Debug, Clone)]
pub struct ImageRequest {
    pub prompt: String,
    pub seed: u64,
    pub cfg_scale: f32,
    pub steps: u32,
    pub style_preset: Option<String>,
}

/// A decoded image.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    /// PNG bytes.
    pub png: Vec<u8>,
    pub model: String,
    pub seed: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Provider traits
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// A text-completion backend.
///
/// One call is one attempt: implementations must not retry, and they
/// must not fall back to another region.
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a completion request and wait for the full response.
    async fn complete(&self, req: CompletionRequest) -> Result<Completion>;

    /// A unique identifier for this provider instance.
    fn provider_id(&self) -> &str;

    /// Model identifier requests are sent to.
    fn model(&self) -> &str;
}

/// A text-to-image backend.
#[async_trait::async_trait]
pub trait ImageProvider: Send + Sync {
    async fn generate(&self, req: ImageRequest) -> Result<GeneratedImage>;

    fn provider_id(&self) -> &str;
}
