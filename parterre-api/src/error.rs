use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parterre_core::ReservationError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Missing authentication")]
    Unauthenticated,
    #[error("Invalid authentication")]
    Forbidden,
    #[error("{0}")]
    InvalidPayload(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Too many requests")]
    RateLimited,
    #[error(transparent)]
    Reservation(#[from] ReservationError),
    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::InvalidPayload(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, self.to_string()),
            AppError::Reservation(err) => return reservation_response(err),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

/// Core failures carry their own wire shape: business outcomes answer with
/// the `success`/`message` body, store faults stay opaque 500s.
fn reservation_response(err: ReservationError) -> Response {
    match err {
        ReservationError::SeatUnavailable => (
            StatusCode::CONFLICT,
            Json(json!({ "success": false, "message": "Seat Unavailable" })),
        )
            .into_response(),
        ReservationError::LockExpiredOrStolen => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Lock expired or seat not held" })),
        )
            .into_response(),
        ReservationError::AlreadySold => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "success": false, "message": "Seat already sold" })),
        )
            .into_response(),
        ReservationError::UnknownSeat(seat_id) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": format!("Unknown seat: {}", seat_id) })),
        )
            .into_response(),
        ReservationError::Hss(e) => {
            tracing::error!("Hot state store failure: {}", e);
            internal()
        }
        ReservationError::Drs(e) => {
            tracing::error!("Durable store failure: {}", e);
            internal()
        }
        ReservationError::ReceiptDecode(e) => {
            tracing::error!("Receipt decode failure: {}", e);
            internal()
        }
    }
}

fn internal() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "Internal Server Error" })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_failures_map_to_expected_status_codes() {
        let cases = [
            (
                AppError::Reservation(ReservationError::SeatUnavailable),
                StatusCode::CONFLICT,
            ),
            (
                AppError::Reservation(ReservationError::LockExpiredOrStolen),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::Reservation(ReservationError::AlreadySold),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AppError::Forbidden, StatusCode::FORBIDDEN),
            (AppError::RateLimited, StatusCode::TOO_MANY_REQUESTS),
            (
                AppError::InvalidPayload("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
