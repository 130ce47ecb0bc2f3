//! Turn orchestration: one query in, one answer out.
//!
//! Two paths from a single entry:
//!
//! - **Reset**: the trimmed query equals the reset command exactly. The
//!   history blob is overwritten with nothing; profile and LLM are not
//!   touched.
//! - **Answer**: profile → history → prompt → LLM → append → respond.
//!
//! Calls for the same identifier are not coordinated. Two concurrent turns
//! both append to the history they read, and the later write wins.

use serde::Serialize;
use tracing::Instrument;

use af_domain::error::Result;
use af_domain::trace::TraceEvent;

use crate::state::AppState;

/// Input for one turn.
#[derive(Debug, Clone)]
pub struct TurnInput {
    pub id: String,
    pub query: String,
}

/// What a turn did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// History was cleared.
    Reset,
    /// The model answered and the turn was appended to history.
    Answered { answer: String, query: String },
}

/// Whether `query` is the reset command. Only surrounding whitespace is
/// ignored; case is significant.
pub fn is_reset_command(query: &str, command: &str) -> bool {
    query.trim() == command
}

/// Run one turn.
///
/// Every store or model failure is returned unchanged. On error nothing
/// has been written, except that an append failure happens after the
/// model call and so loses that answer.
pub async fn run_turn(state: &AppState, input: TurnInput) -> Result<TurnOutcome> {
    let span = tracing::info_span!("turn", id = %input.id);
    run_turn_inner(state, input).instrument(span).await
}

async fn run_turn_inner(state: &AppState, input: TurnInput) -> Result<TurnOutcome> {
    let conversation = &state.config.conversation;
    let TurnInput { id, query } = input;

    if is_reset_command(&query, &conversation.reset_command) {
        state.history.reset(&id).await?;
        tracing::info!("history reset");
        TraceEvent::TurnCompleted {
            id,
            reset: true,
            answer_chars: 0,
        }
        .emit();
        return Ok(TurnOutcome::Reset);
    }

    let profile = state.profiles.read(&id).await?;
    let history = state.history.load(&id, conversation.chat_window).await?;

    let (prompt, report) = state
        .composer
        .compose_chat(&profile, &history.window, &query);
    report.emit();

    let answer = state.llm.invoke(&prompt, &state.config.llm.chat).await?;

    // Append to the full stored text, never to the window.
    state
        .history
        .append(&id, &history.raw, &query, &answer)
        .await?;

    TraceEvent::TurnCompleted {
        id,
        reset: false,
        answer_chars: answer.chars().count(),
    }
    .emit();

    Ok(TurnOutcome::Answered { answer, query })
}
