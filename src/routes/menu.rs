//! Menu route.

use axum::Json;
use axum::extract::State;
use protocol::MenuItem;
use tracing::error;

use super::ApiError;
use super::auth::AuthUser;
use crate::services::catalog;
use crate::state::AppState;

/// `GET /menu`: every item in catalog order.
pub async fn list_menu(State(state): State<AppState>, _auth: AuthUser) -> Result<Json<Vec<MenuItem>>, ApiError> {
    let items = catalog::list_items(&state.pool).await.map_err(|e| {
        error!(error = %e, "menu: load failed");
        ApiError::internal("Failed to load menu")
    })?;
    Ok(Json(items))
}
