use axum::{extract::State, response::IntoResponse, Extension, Json};
use serde::Deserialize;

use crate::error::AppError;
use crate::holds::validate_seat_id;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub idempotency_key: String,
    pub seat_id: String,
}

/// Two-phase purchase: the engine replays the cached receipt for a retried
/// idempotency key, otherwise verifies the caller's hold and promotes it to
/// a booking. The authorizing identity comes from the bearer token only.
pub async fn pay_seat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<PayRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_seat_id(&req.seat_id)?;
    if req.idempotency_key.is_empty() || req.idempotency_key.len() > 128 {
        return Err(AppError::InvalidPayload("Invalid idempotency key".to_string()));
    }

    let receipt = state
        .engine
        .purchase(&req.idempotency_key, &req.seat_id, &user.user_id)
        .await?;

    Ok(Json(receipt))
}
