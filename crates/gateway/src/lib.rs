//! my-ai-friend gateway: the turn orchestrator and handlers, their HTTP
//! and serverless surfaces, and the CLI that starts them.

pub mod api;
pub mod bootstrap;
pub mod cli;
pub mod runtime;
pub mod state;
