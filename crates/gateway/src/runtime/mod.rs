//! Core runtime: the turn orchestrator and the profile, introduction and
//! portrait handlers it shares state with.
//!
//! Every function here is transport-agnostic; the HTTP router and the
//! serverless adapter both call into it.

pub mod image;
pub mod profile;
pub mod summary;
pub mod turn;

pub use image::{generate_portrait, Portrait};
pub use profile::update_profile;
pub use summary::introduce;
pub use turn::{is_reset_command, run_turn, TurnInput, TurnOutcome};
