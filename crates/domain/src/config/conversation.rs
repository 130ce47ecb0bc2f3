use serde::{Deserialize, Serialize};

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Conversation state
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationConfig {
    /// Query that clears the history instead of being answered. Compared
    /// case-sensitively against the trimmed query.
    #[serde(default = "d_reset_command")]
    pub reset_command: String,
    /// Raw history lines surfaced to the chat prompt.
    #[serde(default = "d_30")]
    pub chat_window: usize,
    /// Raw history lines surfaced to the introduction prompt.
    #[serde(default = "d_10")]
    pub summary_window: usize,
    /// Key prefix for profile and history blobs.
    #[serde(default = "d_info_prefix")]
    pub info_prefix: String,
    /// Key prefix for generated images.
    #[serde(default = "d_data_prefix")]
    pub data_prefix: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            reset_command: d_reset_command(),
            chat_window: 30,
            summary_window: 10,
            info_prefix: d_info_prefix(),
            data_prefix: d_data_prefix(),
        }
    }
}

// ── serde default helpers ───────────────────────────────────────────

fn d_reset_command() -> String {
    "DELETE HISTORY".into()
}
fn d_30() -> usize {
    30
}
fn d_10() -> usize {
    10
}
fn d_info_prefix() -> String {
    "info".into()
}
fn d_data_prefix() -> String {
    "data".into()
}
