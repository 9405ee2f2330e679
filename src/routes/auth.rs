//! Auth routes: registration, login, profile, logout, and the bearer
//! extractor every protected route uses.

use axum::Json;
use axum::extract::{FromRef, FromRequestParts, State};
use axum::http::StatusCode;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use protocol::{
    CheckUsernameRequest, CheckUsernameResponse, LoginRequest, LoginResponse, MessageBody, RegisterRequest,
    UserProfile, UserSummary,
};
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{ApiError, ApiJson};
use crate::services::auth::{self as auth_svc, AuthError};
use crate::services::conversation;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from `Authorization: Bearer <jwt>`.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix(BEARER_PREFIX))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(ApiError::unauthorized)?;

        let app_state = AppState::from_ref(state);
        let claims = app_state.jwt.verify(token).map_err(|e| {
            debug!(error = %e, "auth: bearer token rejected");
            ApiError::unauthorized()
        })?;
        let user_id = claims.user_id().map_err(|_| ApiError::unauthorized())?;

        Ok(Self { user_id })
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::InvalidToken(_) => Self::unauthorized(),
            e if e.is_client_error() => Self::new(StatusCode::BAD_REQUEST, e.to_string()),
            e => {
                error!(error = %e, "auth: request failed");
                Self::internal("Internal server error")
            }
        }
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /register`: create an account.
pub async fn register(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageBody>), ApiError> {
    auth_svc::register(&state.pool, &body).await?;
    Ok((StatusCode::CREATED, Json(MessageBody { message: "User registered successfully".into() })))
}

/// `POST /login`: exchange credentials for a bearer token.
pub async fn login(State(state): State<AppState>, ApiJson(body): ApiJson<LoginRequest>) -> Result<Json<LoginResponse>, ApiError> {
    let (user, token) = auth_svc::login(&state.pool, &state.jwt, &body.username, &body.password).await?;
    Ok(Json(LoginResponse { token, user: UserSummary { id: user.id.to_string(), username: user.username } }))
}

/// `POST /check-username`: whether a username is still free.
pub async fn check_username(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CheckUsernameRequest>,
) -> Result<Json<CheckUsernameResponse>, ApiError> {
    if body.username.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Username is required"));
    }
    let available = auth_svc::username_available(&state.pool, &body.username).await?;
    Ok(Json(CheckUsernameResponse { available }))
}

/// `GET /dashboard`: the caller's profile.
pub async fn dashboard(State(state): State<AppState>, auth: AuthUser) -> Result<Json<UserProfile>, ApiError> {
    let user = auth_svc::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "User not found"))?;
    Ok(Json(UserProfile { id: user.id.to_string(), username: user.username, email: user.email }))
}

/// `POST /logout`: wipe the caller's chat sessions. The client discards its
/// token.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> Result<Json<MessageBody>, ApiError> {
    let removed = conversation::delete_user_sessions(&state.pool, auth.user_id)
        .await
        .map_err(|e| {
            error!(user_id = %auth.user_id, error = %e, "auth: logout cleanup failed");
            ApiError::internal("Failed to logout properly")
        })?;
    info!(user_id = %auth.user_id, sessions = removed, "auth: logout");
    Ok(Json(MessageBody { message: "Logged out successfully".into() }))
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
