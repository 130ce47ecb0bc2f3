//! Shared types for the my-ai-friend crates: the error type, the config
//! tree, structured trace events and the companion profile model.

pub mod config;
pub mod error;
pub mod profile;
pub mod trace;
