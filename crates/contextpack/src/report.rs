use serde::{Deserialize, Serialize};

use af_domain::trace::TraceEvent;

/// Which prompt template was rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptKind {
    /// One conversational turn.
    Chat,
    /// The AI introducing itself to the child.
    Introduction,
}

impl PromptKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PromptKind::Chat => "chat",
            PromptKind::Introduction => "introduction",
        }
    }
}

/// Per-block size within a composed prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockReport {
    pub tag: String,
    pub chars: usize,
}

/// What went into a composed prompt, in block order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptReport {
    pub kind: PromptKind,
    pub blocks: Vec<BlockReport>,
    pub history_chars: usize,
    pub total_chars: usize,
}

impl PromptReport {
    pub fn emit(&self) {
        TraceEvent::PromptComposed {
            kind: self.kind.as_str().to_owned(),
            prompt_chars: self.total_chars,
            history_chars: self.history_chars,
        }
        .emit();
    }
}
