mod conversation;
mod image;
mod llm;
mod server;
mod store;

pub use conversation::*;
pub use image::*;
pub use llm::*;
pub use server::*;
pub use store::*;

use serde::{Deserialize, Serialize};
use std::fmt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Top-level config
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Log export. Without `otlp_endpoint` the server writes JSON logs only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// OTLP/gRPC collector, e.g. `http://localhost:4317`.
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "d_service_name")]
    pub service_name: String,
    /// Fraction of traces exported, `0.0..=1.0`.
    #[serde(default = "d_sample_rate")]
    pub sample_rate: f64,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            otlp_endpoint: None,
            service_name: d_service_name(),
            sample_rate: d_sample_rate(),
        }
    }
}

fn d_service_name() -> String {
    "my-ai-friend".into()
}
fn d_sample_rate() -> f64 {
    1.0
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Config validation
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Severity level for a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Error,
    Warning,
}

/// A single configuration validation issue.
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub severity: ConfigSeverity,
    pub field: String,
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Error => "ERROR",
            ConfigSeverity::Warning => "WARN",
        };
        write!(f, "[{tag}] {}: {}", self.field, self.message)
    }
}

impl Config {
    /// Validate the configuration and return a list of issues.
    ///
    /// Returns an empty vec when everything looks good.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let mut error = |field: &str, message: &str| {
            errors.push(ConfigError {
                severity: ConfigSeverity::Error,
                field: field.into(),
                message: message.into(),
            })
        };

        if self.server.port == 0 {
            error("server.port", "port must be greater than 0");
        }
        if self.server.host.is_empty() {
            error("server.host", "host must not be empty");
        }
        if self.store.bucket.is_empty() {
            error("store.bucket", "bucket must not be empty");
        }
        if self.store.backend == StoreBackend::Http
            && self.store.base_url.as_deref().map_or(true, str::is_empty)
        {
            error("store.base_url", "base_url is required for the http backend");
        }
        if self.conversation.reset_command.trim().is_empty() {
            error("conversation.reset_command", "reset command must not be blank");
        }
        if self.conversation.chat_window == 0 {
            error("conversation.chat_window", "window must be at least one line");
        }
        if self.conversation.summary_window == 0 {
            error("conversation.summary_window", "window must be at least one line");
        }
        if self.llm.regions.is_empty() {
            error("llm.regions", "at least one candidate region is required");
        }
        if self.llm.model_id.is_empty() {
            error("llm.model_id", "model_id must not be empty");
        }
        if !(0.0..=1.0).contains(&self.observability.sample_rate) {
            error("observability.sample_rate", "sample_rate must be between 0.0 and 1.0");
        }
        if self
            .observability
            .otlp_endpoint
            .as_deref()
            .is_some_and(|e| e.trim().is_empty())
        {
            error("observability.otlp_endpoint", "endpoint must not be blank when set");
        }
        if !self.llm.endpoint.contains("{region}") {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "llm.endpoint".into(),
                message: "endpoint has no {region} placeholder; every region hits the same host"
                    .into(),
            });
        }

        // CORS: warn if wildcard is used.
        if self.server.cors.allowed_origins.len() == 1
            && self.server.cors.allowed_origins[0] == "*"
        {
            errors.push(ConfigError {
                severity: ConfigSeverity::Warning,
                field: "server.cors.allowed_origins".into(),
                message: "wildcard \"*\" allows preflight from all origins".into(),
            });
        }

        errors
    }
}
