//! Prompt composition for my-ai-friend.
//!
//! Renders the fixed Korean instruction templates around the profile,
//! windowed history and query. Returns the prompt text together with a
//! [`PromptReport`] describing what went in.

pub mod builder;
pub mod injection;
pub mod report;

pub use builder::PromptComposer;
pub use report::{BlockReport, PromptKind, PromptReport};
