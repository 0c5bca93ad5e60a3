use axum::{extract::State, http::StatusCode, response::IntoResponse, Extension, Json};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockRequest {
    pub seat_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRequest {
    pub seat_id: String,
    pub user_id: String,
}

pub async fn lock_seat(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<LockRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_seat_id(&req.seat_id)?;

    match state.engine.hold(&req.seat_id, &user.user_id).await? {
        parterre_core::HoldOutcome::Acquired => {
            Ok(Json(json!({ "success": true })).into_response())
        }
        parterre_core::HoldOutcome::Conflict => Ok((
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "message": "Seat Unavailable" })),
        )
            .into_response()),
    }
}

/// Unauthenticated by design: releases fire from page-unload beacons that
/// cannot carry headers. The hot-store script only deletes a lock whose
/// value matches the claimed holder, so the worst a forged call can do is
/// nothing.
pub async fn release_seat(
    State(state): State<AppState>,
    Json(req): Json<ReleaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_seat_id(&req.seat_id)?;
    if req.user_id.is_empty() {
        return Err(AppError::InvalidPayload("Missing user id".to_string()));
    }

    state.engine.release(&req.seat_id, &req.user_id).await?;
    Ok(Json(json!({ "success": true })))
}

pub fn validate_seat_id(seat_id: &str) -> Result<(), AppError> {
    let well_formed = !seat_id.is_empty()
        && seat_id.len() <= 8
        && seat_id.chars().all(|c| c.is_ascii_alphanumeric());
    if well_formed {
        Ok(())
    } else {
        Err(AppError::InvalidPayload("Invalid seat id".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_seat_ids() {
        assert!(validate_seat_id("A1").is_ok());
        assert!(validate_seat_id("J10").is_ok());
    }

    #[test]
    fn rejects_malformed_seat_ids() {
        assert!(validate_seat_id("").is_err());
        assert!(validate_seat_id("A1 ").is_err());
        assert!(validate_seat_id("seat:A1").is_err());
        assert!(validate_seat_id("A1\n").is_err());
        assert!(validate_seat_id("AAAAAAAAA").is_err());
    }
}
