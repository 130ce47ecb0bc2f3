//! The AI introducing itself to the child it was designed by.

use tracing::Instrument;

use af_domain::error::Result;

use crate::state::AppState;

/// Compose the introduction prompt from the profile and the most recent
/// history, and return the model's answer. History is read, never written.
pub async fn introduce(state: &AppState, id: &str) -> Result<String> {
    let span = tracing::info_span!("introduce", id = %id);
    async {
        let profile = state.profiles.read(id).await?;
        let history = state
            .history
            .read(id, state.config.conversation.summary_window)
            .await?;

        let (prompt, report) = state.composer.compose_introduction(&profile, &history);
        report.emit();

        state.llm.invoke(&prompt, &state.config.llm.summary).await
    }
    .instrument(span)
    .await
}
