//! Per-identifier conversation history.
//!
//! History is one flat text blob of turn records, oldest first:
//!
//! ```text
//! Human: <query>
//! AI: <answer>
//! ```
//!
//! Prompts only ever see a bounded window of the most recent lines. The
//! window is a view: [`HistoryStore::append`] always extends the full
//! stored text, so what gets persisted never shrinks to the window.

use std::sync::Arc;

use af_blobstore::BlobStore;
use af_domain::error::{Error, Result};
use af_domain::trace::TraceEvent;

use crate::keys::KeyLayout;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Snapshot
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// History as read at the start of a turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySnapshot {
    /// The full stored text. This, not `window`, is what a turn appends to.
    pub raw: String,
    /// The last `W` lines of `raw`, each trimmed and newline-terminated.
    pub window: String,
}

/// Keep the last `window` lines of `text`, trimming each line and
/// terminating it with `\n`. Empty input yields an empty string.
pub fn window_lines(text: &str, window: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(window);
    lines[start..].iter().fold(String::new(), |mut out, line| {
        out.push_str(line.trim());
        out.push('\n');
        out
    })
}

/// The two-line record persisted for one turn.
pub fn turn_record(query: &str, answer: &str) -> String {
    format!("Human: {query}\nAI: {answer}\n")
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Store
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Clone)]
pub struct HistoryStore {
    store: Arc<dyn BlobStore>,
    keys: KeyLayout,
}

impl HistoryStore {
    pub fn new(store: Arc<dyn BlobStore>, keys: KeyLayout) -> Self {
        Self { store, keys }
    }

    /// Full stored text; `""` when no history blob exists yet.
    pub async fn read_raw(&self, id: &str) -> Result<String> {
        let key = self.keys.history_key(id);
        match self.store.get(&key).await? {
            Some(bytes) => String::from_utf8(bytes).map_err(|e| Error::Store {
                key,
                message: format!("history is not UTF-8: {e}"),
            }),
            None => Ok(String::new()),
        }
    }

    /// Read the full text and its last-`window`-lines view in one fetch.
    pub async fn load(&self, id: &str, window: usize) -> Result<HistorySnapshot> {
        let raw = self.read_raw(id).await?;
        let window_text = window_lines(&raw, window);

        TraceEvent::HistoryRead {
            id: id.to_owned(),
            raw_lines: raw.lines().count(),
            window_lines: window_text.lines().count(),
        }
        .emit();

        Ok(HistorySnapshot {
            raw,
            window: window_text,
        })
    }

    /// The last `window` lines only.
    pub async fn read(&self, id: &str, window: usize) -> Result<String> {
        Ok(self.load(id, window).await?.window)
    }

    /// Persist `prior_text` followed by the record for this turn,
    /// overwriting the blob.
    ///
    /// `prior_text` must be the untrimmed text from
    /// [`HistorySnapshot::raw`]; passing the window here would drop every
    /// line outside it.
    pub async fn append(&self, id: &str, prior_text: &str, query: &str, answer: &str) -> Result<()> {
        let mut next = String::with_capacity(prior_text.len() + query.len() + answer.len() + 12);
        next.push_str(prior_text);
        next.push_str(&turn_record(query, answer));

        let bytes = next.len();
        self.store.put(&self.keys.history_key(id), next.into_bytes()).await?;

        TraceEvent::HistoryAppended {
            id: id.to_owned(),
            bytes,
        }
        .emit();
        Ok(())
    }

    /// Overwrite the history with an empty blob, whether or not one exists.
    pub async fn reset(&self, id: &str) -> Result<()> {
        self.store.put(&self.keys.history_key(id), Vec::new()).await?;
        TraceEvent::HistoryReset { id: id.to_owned() }.emit();
        Ok(())
    }
}
