//! Consult service. Runs one chat turn: prompt → model → display text + cart
//! directives.
//!
//! DESIGN
//! ======
//! Order of work for a turn:
//! 1. reject a blank prompt and a missing model before any I/O
//! 2. load the catalog, resolve (or start) the current session, read its tail
//! 3. append the user turn
//! 4. compose the prompt and call the model once
//! 5. parse the reply against the same catalog snapshot
//! 6. append the assistant turn
//!
//! A failure in steps 2-3 aborts the turn. A failure in step 6 is logged and
//! the parsed reply is still returned; the user already has an answer.

use std::time::Instant;

use protocol::Role;
use tracing::{info, warn};
use uuid::Uuid;

use super::conversation::{self, CONTEXT_WINDOW};
use super::directive::{self, ParsedReply};
use super::{catalog, prompt};
use crate::llm::types::LlmError;
use crate::state::AppState;

/// Shown when the conversation could not be saved.
pub const PERSISTENCE_FAILURE_MESSAGE: &str =
    "Terjadi kesalahan dalam menyimpan percakapan. Silakan coba lagi.";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConsultError {
    #[error("Prompt is required")]
    EmptyPrompt,
    #[error("LLM not configured")]
    LlmNotConfigured,
    #[error("LLM error: {0}")]
    Upstream(#[from] LlmError),
    #[error("conversation persistence failed: {0}")]
    Persistence(#[from] sqlx::Error),
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Run one consultation turn for `user_id`.
///
/// # Errors
///
/// See [`ConsultError`]. Malformed directives are never an error.
pub async fn handle_prompt(state: &AppState, user_id: Uuid, prompt_text: &str) -> Result<ParsedReply, ConsultError> {
    let prompt_text = prompt_text.trim();
    if prompt_text.is_empty() {
        return Err(ConsultError::EmptyPrompt);
    }
    let llm = state.llm.as_ref().ok_or(ConsultError::LlmNotConfigured)?;
    info!(%user_id, prompt_len = prompt_text.len(), "consult: prompt received");

    let menu = catalog::list_items(&state.pool).await?;
    let session = conversation::current_or_start(&state.pool, user_id).await?;
    let history = conversation::recent_messages(&state.pool, session.id, CONTEXT_WINDOW).await?;
    let is_continuation = !history.is_empty();
    conversation::append_message(&state.pool, session.id, Role::User, prompt_text).await?;

    let composed = prompt::compose(&menu, &history, prompt_text, is_continuation);

    let started = Instant::now();
    let generation = match llm.generate(&composed).await {
        Ok(generation) => generation,
        Err(e) => {
            warn!(%user_id, error = %e, "consult: model call failed");
            return Err(e.into());
        }
    };
    info!(
        %user_id,
        model = %generation.model,
        elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
        prompt_tokens = generation.prompt_tokens,
        completion_tokens = generation.completion_tokens,
        "consult: model replied"
    );

    let parsed = directive::parse_reply(&generation.text, &menu);
    info!(%user_id, actions = parsed.actions.len(), "consult: reply parsed");

    let display_text = parsed.display_text.clone();
    let save = conversation::append_message(&state.pool, session.id, Role::Ai, &display_text);
    Ok(record_reply(user_id, session.id, parsed, save).await)
}

/// Await the assistant-turn write. A failed write is logged and the reply
/// is handed back unchanged.
async fn record_reply<T>(
    user_id: Uuid,
    session_id: Uuid,
    parsed: ParsedReply,
    save: impl Future<Output = Result<T, sqlx::Error>>,
) -> ParsedReply {
    if let Err(e) = save.await {
        warn!(%user_id, %session_id, error = %e, "consult: failed to save assistant turn");
    }
    parsed
}

#[cfg(test)]
#[path = "consult_test.rs"]
mod tests;
