//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds the database pool, the optional model client, and the JWT keys.
//! Nothing per-request lives here: carts are client-side and each chat turn
//! builds its own prompt.

use std::sync::Arc;

use sqlx::PgPool;

use crate::llm::LlmGenerate;
use crate::services::auth::JwtKeys;

/// Clone is required by Axum; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    /// `None` when the model is not configured; consult answers 503.
    pub llm: Option<Arc<dyn LlmGenerate>>,
    pub jwt: Arc<JwtKeys>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, llm: Option<Arc<dyn LlmGenerate>>, jwt: JwtKeys) -> Self {
        Self { pool, llm, jwt: Arc::new(jwt) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================

#[cfg(test)]
#[path = "state_helpers_test.rs"]
pub mod test_helpers;
