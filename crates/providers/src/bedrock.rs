//! AWS Bedrock runtime adapters.
//!
//! Calls `POST <endpoint>/model/<model_id>/invoke` over HTTPS with a
//! Bedrock API key sent as a bearer token. The endpoint is a template in
//! which `{region}` is replaced per call, so the same adapter also works
//! against a local gateway or proxy that signs requests itself.
//!
//! Text models use the Anthropic messages body; image models use the
//! Stability text-to-image body.

use std::time::{Duration, Instant};

use base64::Engine;
use serde_json::Value;

use af_domain::config::{ImageConfig, LlmConfig};
use af_domain::error::{from_reqwest, Error, Result};
use af_domain::trace::TraceEvent;

use crate::traits::{
    Completion, CompletionRequest, GeneratedImage, ImageProvider, ImageRequest, LlmProvider, Usage,
};
use crate::util::{endpoint_for, resolve_api_key};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Constants
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Shared HTTP plumbing
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
struct Runtime {
    id: String,
    endpoint: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl Runtime {
    fn new(id: &str, cfg: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(from_reqwest)?;
        Ok(Self {
            id: id.to_owned(),
            endpoint: cfg.endpoint.clone(),
            api_key: resolve_api_key(&cfg.api_key_env),
            client,
        })
    }

    fn invoke_url(&self, region: &str, model_id: &str) -> String {
        format!("{}/model/{}/invoke", endpoint_for(&self.endpoint, region), model_id)
    }

    /// POST `body` and return the parsed JSON response. Non-2xx is a
    /// provider error carrying the status and body.
    async fn invoke(&self, region: &str, model_id: &str, body: &Value) -> Result<Value> {
        let url = self.invoke_url(region, model_id);
        tracing::debug!(provider = %self.id, url = %url, "bedrock invoke request");

        let mut rb = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json");
        if let Some(ref key) = self.api_key {
            rb = rb.bearer_auth(key);
        }

        let resp = rb.json(body).send().await.map_err(from_reqwest)?;
        let status = resp.status();
        let resp_text = resp.text().await.map_err(from_reqwest)?;

        if !status.is_success() {
            return Err(Error::Provider {
                provider: self.id.clone(),
                message: format!("HTTP {} - {}", status.as_u16(), resp_text),
            });
        }

        Ok(serde_json::from_str(&resp_text)?)
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Text completion
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Anthropic models on Bedrock.
pub struct BedrockProvider {
    runtime: Runtime,
    model_id: String,
}

impl BedrockProvider {
    pub fn from_config(cfg: &LlmConfig) -> Result<Self> {
        if cfg.model_id.trim().is_empty() {
            return Err(Error::Config("llm.model_id must not be empty".into()));
        }
        Ok(Self {
            runtime: Runtime::new("bedrock", cfg)?,
            model_id: cfg.model_id.clone(),
        })
    }

    fn build_messages_body(req: &CompletionRequest) -> Value {
        serde_json::json!({
            "anthropic_version": ANTHROPIC_VERSION,
            "max_tokens": req.params.max_tokens,
            "temperature": req.params.temperature,
            "top_k": req.params.top_k,
            "top_p": req.params.top_p,
            "stop_sequences": req.params.stop_sequences,
            "messages": [{
                "role": "user",
                "content": [{ "type": "text", "text": req.prompt }],
            }],
        })
    }
}

fn parse_messages_response(provider: &str, fallback_model: &str, body: &Value) -> Result<Completion> {
    let content: String = body
        .get("content")
        .and_then(Value::as_array)
        .map(|blocks| {
            blocks
                .iter()
                .filter(|b| b.get("type").and_then(Value::as_str) == Some("text"))
                .filter_map(|b| b.get("text").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default();

    if content.trim().is_empty() {
        return Err(Error::Provider {
            provider: provider.to_owned(),
            message: "response contained no text content".into(),
        });
    }

    let model = body
        .get("model")
        .and_then(Value::as_str)
        .unwrap_or(fallback_model)
        .to_owned();
    let stop_reason = body
        .get("stop_reason")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let usage = body.get("usage").and_then(parse_usage);

    Ok(Completion {
        content,
        usage,
        model,
        stop_reason,
    })
}

fn parse_usage(v: &Value) -> Option<Usage> {
    Some(Usage {
        input_tokens: v.get("input_tokens")?.as_u64()? as u32,
        output_tokens: v.get("output_tokens")?.as_u64()? as u32,
    })
}

#[async_trait::async_trait]
impl LlmProvider for BedrockProvider {
    async fn complete(&self, req: CompletionRequest) -> Result<Completion> {
        let body = Self::build_messages_body(&req);
        let start = Instant::now();
        let result = self.runtime.invoke(&req.region, &self.model_id, &body).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        let completion = result
            .and_then(|json| parse_messages_response(&self.runtime.id, &self.model_id, &json));
        let usage = completion.as_ref().ok().and_then(|c| c.usage);
        TraceEvent::LlmRequest {
            provider: self.runtime.id.clone(),
            model: self.model_id.clone(),
            region: req.region.clone(),
            duration_ms,
            input_tokens: usage.map(|u| u.input_tokens),
            output_tokens: usage.map(|u| u.output_tokens),
        }
        .emit();

        completion
    }

    fn provider_id(&self) -> &str {
        &self.runtime.id
    }

    fn model(&self) -> &str {
        &self.model_id
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Image generation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Stability text-to-image models on Bedrock. Always called in the one
/// configured image region.
pub struct BedrockImageProvider {
    runtime: Runtime,
    model_id: String,
    region: String,
}

impl BedrockImageProvider {
    pub fn from_config(llm: &LlmConfig, image: &ImageConfig) -> Result<Self> {
        Ok(Self {
            runtime: Runtime::new("bedrock-image", llm)?,
            model_id: image.model_id.clone(),
            region: image.region.clone(),
        })
    }

    fn build_body(req: &ImageRequest) -> Value {
        let mut body = serde_json::json!({
            "text_prompts": [{ "text": req.prompt }],
            "seed": req.seed,
            "cfg_scale": req.cfg_scale,
            "steps": req.steps,
        });
        if let Some(ref preset) = req.style_preset {
            body["style_preset"] = Value::String(preset.clone());
        }
        body
    }
}

fn parse_image_response(provider: &str, model: &str, body: &Value) -> Result<GeneratedImage> {
    let artifact = body
        .get("artifacts")
        .and_then(Value::as_array)
        .and_then(|a| a.first())
        .ok_or_else(|| Error::Provider {
            provider: provider.to_owned(),
            message: "response contained no artifacts".into(),
        })?;

    let encoded = artifact
        .get("base64")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::Provider {
            provider: provider.to_owned(),
            message: "artifact has no base64 payload".into(),
        })?;

    let png = base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .map_err(|e| Error::Provider {
            provider: provider.to_owned(),
            message: format!("artifact is not valid base64: {e}"),
        })?;

    Ok(GeneratedImage {
        png,
        model: model.to_owned(),
        seed: artifact.get("seed").and_then(Value::as_u64),
    })
}

#[async_trait::async_trait]
impl ImageProvider for BedrockImageProvider {
    async fn generate(&self, req: ImageRequest) -> Result<GeneratedImage> {
        let body = Self::build_body(&req);
        let start = Instant::now();
        let result = self.runtime.invoke(&self.region, &self.model_id, &body).await;
        TraceEvent::LlmRequest {
            provider: self.runtime.id.clone(),
            model: self.model_id.clone(),
            region: self.region.clone(),
            duration_ms: start.elapsed().as_millis() as u64,
            input_tokens: None,
            output_tokens: None,
        }
        .emit();

        parse_image_response(&self.runtime.id, &self.model_id, &result?)
    }

    fn provider_id(&self) -> &str {
        &self.runtime.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use af_domain::config::DecodingConfig;

    #[test]
    fn messages_body_carries_decoding_parameters() {
        let req = CompletionRequest {
            region: "us-east-1".into(),
            prompt: "안녕".into(),
            params: DecodingConfig::chat(),
        };
        let body = BedrockProvider::build_messages_body(&req);
        assert_eq!(body["anthropic_version"], "bedrock-2023-05-31");
        assert_eq!(body["max_tokens"], 512);
        assert_eq!(body["top_k"], 250);
        assert_eq!(body["stop_sequences"][0], "\n\nHuman");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["text"], "안녕");
    }

    #[test]
    fn text_parts_are_concatenated() {
        let body = serde_json::json!({
            "content": [
                {"type": "text", "text": "안녕, "},
                {"type": "tool_use", "id": "x"},
                {"type": "text", "text": "지우야!"}
            ],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 120, "output_tokens": 9}
        });
        let c = parse_messages_response("bedrock", "m", &body).unwrap();
        assert_eq!(c.content, "안녕, 지우야!");
        assert_eq!(c.model, "m");
        assert_eq!(c.stop_reason.as_deref(), Some("end_turn"));
        assert_eq!(c.usage, Some(Usage { input_tokens: 120, output_tokens: 9 }));
    }

    #[test]
    fn empty_content_is_a_provider_error() {
        let body = serde_json::json!({"content": [{"type": "text", "text": "  "}]});
        assert!(matches!(
            parse_messages_response("bedrock", "m", &body),
            Err(Error::Provider { .. })
        ));
        assert!(parse_messages_response("bedrock", "m", &serde_json::json!({})).is_err());
    }

    #[test]
    fn image_body_includes_preset_only_when_set() {
        let mut req = ImageRequest {
            prompt: "a smiling robot".into(),
            seed: 0,
            cfg_scale: 8.0,
            steps: 50,
            style_preset: None,
        };
        let body = BedrockImageProvider::build_body(&req);
        assert_eq!(body["text_prompts"][0]["text"], "a smiling robot");
        assert!(body.get("style_preset").is_none());

        req.style_preset = Some("digital-art".into());
        assert_eq!(BedrockImageProvider::build_body(&req)["style_preset"], "digital-art");
    }

    #[test]
    fn image_artifact_is_decoded() {
        let body = serde_json::json!({"artifacts": [{"base64": "iVBORw0KGgo=", "seed": 7}]});
        let img = parse_image_response("bedrock-image", "sdxl", &body).unwrap();
        assert_eq!(img.png, b"\x89PNG\r\n\x1a\n");
        assert_eq!(img.seed, Some(7));

        let missing = serde_json::json!({"artifacts": []});
        assert!(matches!(
            parse_image_response("bedrock-image", "sdxl", &missing),
            Err(Error::Provider { .. })
        ));
    }
}
