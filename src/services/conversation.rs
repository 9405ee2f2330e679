//! Conversation store: append-only per-user message log with a rolling
//! session boundary.
//!
//! ARCHITECTURE
//! ============
//! A user owns many `conversations` rows; the most recently created one is
//! the current session while it is younger than [`SESSION_TTL_MS`]. After
//! that, the next prompt starts a fresh session. Messages are ordered by a
//! `BIGSERIAL` sequence, so insertion order is the transcript order.
//!
//! TRADE-OFFS
//! ==========
//! The user turn and the assistant turn are two separate inserts. A crash in
//! between leaves an orphaned user turn; chat history is not worth a
//! transaction spanning the model call.

use std::time::{SystemTime, UNIX_EPOCH};

use protocol::{ChatMessage, Role};
use sqlx::{PgPool, Row};
use tracing::{info, warn};
use uuid::Uuid;

/// A session stays current for 24 hours after creation.
pub const SESSION_TTL_MS: i64 = 24 * 60 * 60 * 1000;

/// Number of trailing messages handed to the prompt composer.
pub const CONTEXT_WINDOW: i64 = 10;

/// One conversation session row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    /// Milliseconds since the Unix epoch.
    pub created_at_ms: i64,
}

/// Whether a session created at `created_at_ms` is still current at `now_ms`.
#[must_use]
pub fn is_current(created_at_ms: i64, now_ms: i64) -> bool {
    now_ms - created_at_ms < SESSION_TTL_MS
}

pub(crate) fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
}

/// Return the user's current session, if the latest one has not rolled over.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn current_session(pool: &PgPool, user_id: Uuid) -> Result<Option<Session>, sqlx::Error> {
    let row = sqlx::query(
        r"SELECT id, user_id, (EXTRACT(EPOCH FROM created_at) * 1000)::bigint AS created_at_ms
          FROM conversations
          WHERE user_id = $1
          ORDER BY created_at DESC
          LIMIT 1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    let latest = row.map(|r| Session {
        id: r.get("id"),
        user_id: r.get("user_id"),
        created_at_ms: r.get("created_at_ms"),
    });

    Ok(latest.filter(|s| is_current(s.created_at_ms, now_ms())))
}

/// Create a new empty session for the user.
///
/// # Errors
///
/// Returns a database error if the insert fails.
pub async fn start_session(pool: &PgPool, user_id: Uuid) -> Result<Session, sqlx::Error> {
    let row = sqlx::query(
        r"INSERT INTO conversations (user_id) VALUES ($1)
          RETURNING id, user_id, (EXTRACT(EPOCH FROM created_at) * 1000)::bigint AS created_at_ms",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;

    let session = Session { id: row.get("id"), user_id: row.get("user_id"), created_at_ms: row.get("created_at_ms") };
    info!(%user_id, session_id = %session.id, "conversation: new session started");
    Ok(session)
}

/// Return the current session, starting a new one when none is current.
///
/// # Errors
///
/// Returns a database error if either query fails.
pub async fn current_or_start(pool: &PgPool, user_id: Uuid) -> Result<Session, sqlx::Error> {
    match current_session(pool, user_id).await? {
        Some(session) => Ok(session),
        None => start_session(pool, user_id).await,
    }
}

/// Append one message to a session.
///
/// # Errors
///
/// Returns a database error if the insert fails (including empty content).
pub async fn append_message(
    pool: &PgPool,
    session_id: Uuid,
    role: Role,
    content: &str,
) -> Result<ChatMessage, sqlx::Error> {
    let row = sqlx::query(
        r"INSERT INTO conversation_messages (conversation_id, role, content)
          VALUES ($1, $2, $3)
          RETURNING (EXTRACT(EPOCH FROM created_at) * 1000)::bigint AS timestamp_ms",
    )
    .bind(session_id)
    .bind(role.as_str())
    .bind(content)
    .fetch_one(pool)
    .await?;

    Ok(ChatMessage { role, content: content.to_owned(), timestamp_ms: row.get("timestamp_ms") })
}

/// Read the last `limit` messages of a session, oldest first.
///
/// # Errors
///
/// Returns a database error if the query fails.
pub async fn recent_messages(pool: &PgPool, session_id: Uuid, limit: i64) -> Result<Vec<ChatMessage>, sqlx::Error> {
    // Tail by sequence, then re-order chronologically.
    let rows = sqlx::query(
        r"SELECT sub.role, sub.content, sub.timestamp_ms FROM (
              SELECT seq, role, content,
                     (EXTRACT(EPOCH FROM created_at) * 1000)::bigint AS timestamp_ms
              FROM conversation_messages
              WHERE conversation_id = $1
              ORDER BY seq DESC
              LIMIT $2
          ) sub
          ORDER BY sub.seq ASC",
    )
    .bind(session_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    let messages = rows
        .into_iter()
        .filter_map(|r| {
            let raw_role: String = r.get("role");
            let Ok(role) = raw_role.parse::<Role>() else {
                warn!(%session_id, role = %raw_role, "conversation: skipping message with unknown role");
                return None;
            };
            Some(ChatMessage { role, content: r.get("content"), timestamp_ms: r.get("timestamp_ms") })
        })
        .collect();

    Ok(messages)
}

/// Delete every session (and, by cascade, every message) of a user.
/// Returns the number of sessions removed.
///
/// # Errors
///
/// Returns a database error if the delete fails.
pub async fn delete_user_sessions(pool: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM conversations WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
#[path = "conversation_test.rs"]
mod tests;
