//! Per-identifier conversation state for my-ai-friend.
//!
//! Everything a turn remembers lives in the blob store: a flat-text history
//! blob and a JSON profile blob per identifier. This crate owns the key
//! layout and the read/write rules for both.

pub mod history;
pub mod keys;
pub mod profile;

pub use history::{turn_record, window_lines, HistorySnapshot, HistoryStore};
pub use keys::KeyLayout;
pub use profile::ProfileStore;
