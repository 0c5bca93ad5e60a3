use axum::{extract::State, response::IntoResponse, Json};
use parterre_domain::SeatView;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SeatsResponse {
    pub seats: Vec<SeatView>,
}

/// Polling endpoint: ledger records overlaid with live holds. Eventually
/// consistent; clients treat it as a hint and the write paths enforce
/// correctness.
pub async fn list_seats(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let seats = state.engine.snapshot().await?;
    Ok(Json(SeatsResponse { seats }))
}
