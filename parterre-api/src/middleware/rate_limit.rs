use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

/// Traffic-shaping key for one client. First forwarded-for entry when a
/// fronting proxy supplies one, else the TCP peer. Spoofable by design;
/// this layer shapes load and makes no integrity claim.
pub fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|first| first.trim().to_string())
        .filter(|first| !first.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}

pub async fn hold_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let limit = state.rules.hold_rate_limit;
    let window = state.rules.hold_rate_window_seconds;
    enforce(state, "hold", limit, window, addr, req, next).await
}

pub async fn auth_rate_limit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    let limit = state.rules.auth_rate_limit;
    let window = state.rules.auth_rate_window_seconds;
    enforce(state, "auth", limit, window, addr, req, next).await
}

async fn enforce(
    state: AppState,
    bucket: &str,
    limit: i64,
    window_seconds: i64,
    addr: SocketAddr,
    req: Request,
    next: Next,
) -> Response {
    let key = format!("ratelimit:{}:{}", bucket, client_key(req.headers(), addr));

    match state.redis.check_rate_limit(&key, limit, window_seconds).await {
        Ok(true) => next.run(req).await,
        Ok(false) => {
            tracing::debug!(%key, bucket, "Rate limit exceeded");
            AppError::RateLimited.into_response()
        }
        // Shaping layer, not a security boundary: fail open.
        Err(e) => {
            tracing::warn!(error = %e, "Rate limit check failed, letting request through");
            next.run(req).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn peer() -> SocketAddr {
        "10.0.0.9:52100".parse().unwrap()
    }

    #[test]
    fn forwarded_for_takes_first_entry() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.7, 10.0.0.1, 10.0.0.2"),
        );
        assert_eq!(client_key(&headers, peer()), "203.0.113.7");
    }

    #[test]
    fn falls_back_to_peer_address() {
        assert_eq!(client_key(&HeaderMap::new(), peer()), "10.0.0.9");
    }

    #[test]
    fn empty_header_falls_back_to_peer() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("  "));
        assert_eq!(client_key(&headers, peer()), "10.0.0.9");
    }
}
