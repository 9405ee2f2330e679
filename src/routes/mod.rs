//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! This module binds the JSON HTTP surface: account endpoints at the root
//! (`/register`, `/login`, ...), the bearer-protected menu, and the
//! consultation endpoints under `/api/consult`. Every error leaves as
//! `{"error": message}` through [`ApiError`].

pub mod auth;
pub mod consult;
pub mod menu;

use axum::Json;
use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use protocol::ErrorBody;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

// =============================================================================
// ROUTER
// =============================================================================

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/check-username", post(auth::check_username))
        .route("/dashboard", get(auth::dashboard))
        .route("/logout", post(auth::logout))
        .route("/menu", get(menu::list_menu))
        .route("/api/consult", post(consult::consult))
        .route("/api/consult/history", get(consult::history))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

// =============================================================================
// API ERROR
// =============================================================================

/// An HTTP status plus the message placed in the `{"error": ...}` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    #[must_use]
    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.message))).into_response()
    }
}

// =============================================================================
// JSON BODY EXTRACTOR
// =============================================================================

/// `Json<T>` whose rejection is an [`ApiError`], so a body that fails to
/// parse still answers with `{"error": ...}`.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())),
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
