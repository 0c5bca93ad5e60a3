use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod admin;
pub mod auth;
pub mod error;
pub mod holds;
pub mod mailer;
pub mod middleware;
pub mod payments;
pub mod seats;
pub mod state;
pub mod worker;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
        ]);

    let public = Router::new()
        .route("/api/seats", get(seats::list_seats))
        .route("/api/release", post(holds::release_seat))
        .route("/api/reset", post(admin::reset));

    // Limiter runs before the auth gate; both run before any engine work.
    let lock = Router::new()
        .route("/api/lock", post(holds::lock_seat))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::hold_rate_limit,
        ));

    let pay = Router::new()
        .route("/api/pay", post(payments::pay_seat))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    let account = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/verify-register", post(auth::verify_register))
        .route("/api/auth/login", post(auth::login))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::rate_limit::auth_rate_limit,
        ));

    Router::new()
        .merge(public)
        .merge(lock)
        .merge(pay)
        .merge(account)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
