use serde::Serialize;

/// Structured trace events emitted across all my-ai-friend crates.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    BlobStoreCall {
        backend: String,
        op: String,
        key: String,
        status: u16,
        duration_ms: u64,
    },
    HistoryRead {
        id: String,
        raw_lines: usize,
        window_lines: usize,
    },
    HistoryAppended {
        id: String,
        bytes: usize,
    },
    HistoryReset {
        id: String,
    },
    ProfileLoaded {
        id: String,
        found: bool,
        fields: usize,
    },
    ProfileUpdated {
        id: String,
        changed: Vec<String>,
    },
    PromptComposed {
        kind: String,
        prompt_chars: usize,
        history_chars: usize,
    },
    RegionSelected {
        region: String,
        candidates: usize,
    },
    LlmRequest {
        provider: String,
        model: String,
        region: String,
        duration_ms: u64,
        input_tokens: Option<u32>,
        output_tokens: Option<u32>,
    },
    ImageGenerated {
        id: String,
        model: String,
        bytes: usize,
    },
    TurnCompleted {
        id: String,
        reset: bool,
        answer_chars: usize,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "af_event");
    }
}
