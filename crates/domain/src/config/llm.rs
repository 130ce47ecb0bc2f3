use serde::{Deserialize, Deserializer, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// LLM backend
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "d_model_id")]
    pub model_id: String,
    /// Candidate inference regions. One is picked uniformly at random per
    /// call; a failure in the picked region is not retried elsewhere.
    #[serde(default = "d_regions")]
    pub regions: Vec<String>,
    /// Runtime endpoint template. `{region}` is replaced by the selected
    /// region.
    #[serde(default = "d_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the bearer key. When the variable is
    /// unset no `Authorization` header is sent.
    #[serde(default = "d_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "d_120000")]
    pub timeout_ms: u64,
    /// Decoding parameters for conversation turns.
    #[serde(default = "DecodingConfig::chat", deserialize_with = "chat_decoding")]
    pub chat: DecodingConfig,
    /// Decoding parameters for the one-shot introduction. Fields left out
    /// of `[llm.summary]` keep the summary defaults, not the chat ones.
    #[serde(default = "DecodingConfig::summary", deserialize_with = "summary_decoding")]
    pub summary: DecodingConfig,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model_id: d_model_id(),
            regions: d_regions(),
            endpoint: d_endpoint(),
            api_key_env: d_api_key_env(),
            timeout_ms: 120_000,
            chat: DecodingConfig::chat(),
            summary: DecodingConfig::summary(),
        }
    }
}

/// Fixed sampling parameters sent with every completion request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodingConfig {
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    /// Stops generation at the start of a fabricated human turn.
    pub stop_sequences: Vec<String>,
}

/// A decoding table as written in the file; unset fields fall back to
/// whichever preset the section starts from.
#[derive(Debug, Default, Deserialize)]
struct DecodingOverrides {
    max_tokens: Option<u32>,
    temperature: Option<f32>,
    top_k: Option<u32>,
    top_p: Option<f32>,
    stop_sequences: Option<Vec<String>>,
}

impl DecodingOverrides {
    fn apply(self, base: DecodingConfig) -> DecodingConfig {
        DecodingConfig {
            max_tokens: self.max_tokens.unwrap_or(base.max_tokens),
            temperature: self.temperature.unwrap_or(base.temperature),
            top_k: self.top_k.unwrap_or(base.top_k),
            top_p: self.top_p.unwrap_or(base.top_p),
            stop_sequences: self.stop_sequences.unwrap_or(base.stop_sequences),
        }
    }
}

fn chat_decoding<'de, D: Deserializer<'de>>(d: D) -> Result<DecodingConfig, D::Error> {
    Ok(DecodingOverrides::deserialize(d)?.apply(DecodingConfig::chat()))
}

fn summary_decoding<'de, D: Deserializer<'de>>(d: D) -> Result<DecodingConfig, D::Error> {
    Ok(DecodingOverrides::deserialize(d)?.apply(DecodingConfig::summary()))
}

impl DecodingConfig {
    pub fn chat() -> Self {
        Self {
            max_tokens: 512,
            temperature: 1.0,
            top_k: 250,
            top_p: 1.0,
            stop_sequences: d_stop(),
        }
    }

    pub fn summary() -> Self {
        Self {
            max_tokens: 512,
            temperature: 0.8,
            top_k: 125,
            top_p: 1.0,
            stop_sequences: d_stop(),
        }
    }
}

impl Default for DecodingConfig {
    fn default() -> Self {
        Self::chat()
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_model_id() -> String {
    "anthropic.claude-3-sonnet-20240229-v1:0".into()
}
fn d_regions() -> Vec<String> {
    ["us-west-2", "us-east-1", "ap-southeast-2", "eu-west-3"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn d_endpoint() -> String {
    "https://bedrock-runtime.{region}.amazonaws.com".into()
}
fn d_api_key_env() -> String {
    "AWS_BEARER_TOKEN_BEDROCK".into()
}
fn d_120000() -> u64 {
    120_000
}
fn d_stop() -> Vec<String> {
    vec!["\n\nHuman".into()]
}
