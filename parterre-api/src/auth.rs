use axum::{extract::State, response::IntoResponse, Json};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;

use parterre_store::UserRepository;

use crate::error::AppError;
use crate::middleware::auth::issue_token;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRegisterRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
    pub user_id: String,
}

/// Start registration: issue a short-lived OTP and deliver it out of band.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&req.email)?;

    let code = format!("{:06}", rand::thread_rng().gen_range(0..1_000_000));
    state
        .redis
        .set_otp(&email, &code, state.rules.otp_ttl_seconds)
        .await
        .map_err(|e| AppError::Anyhow(e.into()))?;

    state.mailer.send_otp(&email, &code).await;

    Ok(Json(json!({ "success": true })))
}

/// Complete registration: the OTP is consumed on first use, matching or not,
/// so a code cannot be brute-forced or replayed.
pub async fn verify_register(
    State(state): State<AppState>,
    Json(req): Json<VerifyRegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&req.email)?;
    if req.password.len() < 8 {
        return Err(AppError::InvalidPayload(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let stored = state
        .redis
        .take_otp(&email)
        .await
        .map_err(|e| AppError::Anyhow(e.into()))?;
    if stored.as_deref() != Some(req.otp.as_str()) {
        return Err(AppError::InvalidPayload(
            "Invalid or expired code".to_string(),
        ));
    }

    let password_hash =
        bcrypt::hash(&req.password, bcrypt::DEFAULT_COST).map_err(anyhow::Error::from)?;

    let user = match UserRepository::insert(
        &state.db.pool,
        &email,
        &password_hash,
        req.phone.as_deref(),
    )
    .await
    {
        Ok(user) => user,
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        Err(e) => return Err(AppError::Anyhow(e.into())),
    };

    let user_id = user.id.to_string();
    let token = issue_token(
        &state.auth.secret,
        state.auth.expiration_seconds,
        &user_id,
        &email,
    )
    .map_err(anyhow::Error::from)?;

    tracing::info!(%email, %user_id, "User registered");

    Ok(Json(TokenResponse {
        success: true,
        token,
        user_id,
    }))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let email = normalize_email(&req.email)?;

    let user = UserRepository::find_by_email(&state.db.pool, &email)
        .await
        .map_err(|e| AppError::Anyhow(e.into()))?
        .ok_or(AppError::Forbidden)?;

    let valid = bcrypt::verify(&req.password, &user.password_hash).unwrap_or(false);
    if !valid {
        return Err(AppError::Forbidden);
    }

    let user_id = user.id.to_string();
    let token = issue_token(
        &state.auth.secret,
        state.auth.expiration_seconds,
        &user_id,
        &email,
    )
    .map_err(anyhow::Error::from)?;

    Ok(Json(TokenResponse {
        success: true,
        token,
        user_id,
    }))
}

fn normalize_email(raw: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();
    let well_formed = email.len() <= 254
        && email
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false);
    if well_formed {
        Ok(email)
    } else {
        Err(AppError::InvalidPayload("Invalid email".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(
            normalize_email("  Fan@Example.COM ").unwrap(),
            "fan@example.com"
        );
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(normalize_email("").is_err());
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
        assert!(normalize_email("fan@nodot").is_err());
    }
}
