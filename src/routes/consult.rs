//! Consultation routes: one chat turn, and the current session's transcript.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use protocol::{ChatMessage, ConsultRequest, ConsultResponse};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::{ApiError, ApiJson};
use super::auth::AuthUser;
use crate::llm::types::LlmError;
use crate::services::consult::{self as consult_svc, ConsultError, PERSISTENCE_FAILURE_MESSAGE};
use crate::services::conversation;
use crate::state::AppState;

/// Most messages returned by the history endpoint.
pub const HISTORY_LIMIT: i64 = 50;

impl From<ConsultError> for ApiError {
    fn from(e: ConsultError) -> Self {
        match e {
            ConsultError::EmptyPrompt => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            ConsultError::LlmNotConfigured => {
                Self::new(StatusCode::SERVICE_UNAVAILABLE, "AI consultation is not configured")
            }
            ConsultError::Upstream(ref llm) => {
                let status = match llm {
                    LlmError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                    _ => StatusCode::BAD_GATEWAY,
                };
                Self::new(status, llm.user_message())
            }
            ConsultError::Persistence(ref db) => {
                error!(error = %db, "consult: persistence failed");
                Self::internal(PERSISTENCE_FAILURE_MESSAGE)
            }
        }
    }
}

/// `POST /api/consult`: run one chat turn.
pub async fn consult(
    State(state): State<AppState>,
    auth: AuthUser,
    ApiJson(body): ApiJson<ConsultRequest>,
) -> Result<Json<ConsultResponse>, ApiError> {
    let parsed = consult_svc::handle_prompt(&state, auth.user_id, &body.prompt).await?;
    Ok(Json(ConsultResponse { display_text: parsed.display_text, actions: parsed.actions }))
}

/// `GET /api/consult/history`: current session, oldest first.
pub async fn history(State(state): State<AppState>, auth: AuthUser) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = load_history(&state.pool, auth.user_id)
        .await
        .map_err(ConsultError::Persistence)?;
    Ok(Json(messages))
}

async fn load_history(pool: &PgPool, user_id: Uuid) -> Result<Vec<ChatMessage>, sqlx::Error> {
    match conversation::current_session(pool, user_id).await? {
        Some(session) => conversation::recent_messages(pool, session.id, HISTORY_LIMIT).await,
        None => Ok(Vec::new()),
    }
}

#[cfg(test)]
#[path = "consult_test.rs"]
mod tests;
