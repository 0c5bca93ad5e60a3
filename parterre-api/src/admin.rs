use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Development/demo reset: wipes every volatile key and reopens all seats.
/// Deliberately unauthenticated in the current design.
pub async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    state.engine.reset().await?;
    Ok(Json(json!({ "success": true })))
}
