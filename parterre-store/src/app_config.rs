use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub email: EmailConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

/// SMTP settings for OTP delivery. All optional; with no host configured the
/// code is logged instead of mailed (development mode).
#[derive(Debug, Deserialize, Clone, Default)]
pub struct EmailConfig {
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    #[serde(default = "default_from_address")]
    pub from_address: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_address() -> String {
    "tickets@parterre.local".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_hold_seconds")]
    pub hold_seconds: u64,
    #[serde(default = "default_receipt_ttl_seconds")]
    pub receipt_ttl_seconds: u64,
    #[serde(default = "default_otp_ttl_seconds")]
    pub otp_ttl_seconds: u64,
    #[serde(default = "default_hold_rate_limit")]
    pub hold_rate_limit: i64,
    #[serde(default = "default_hold_rate_window_seconds")]
    pub hold_rate_window_seconds: i64,
    #[serde(default = "default_auth_rate_limit")]
    pub auth_rate_limit: i64,
    #[serde(default = "default_auth_rate_window_seconds")]
    pub auth_rate_window_seconds: i64,
}

fn default_hold_seconds() -> u64 {
    300
}

fn default_receipt_ttl_seconds() -> u64 {
    86_400
}

fn default_otp_ttl_seconds() -> u64 {
    300
}

fn default_hold_rate_limit() -> i64 {
    10
}

fn default_hold_rate_window_seconds() -> i64 {
    1
}

fn default_auth_rate_limit() -> i64 {
    50
}

fn default_auth_rate_window_seconds() -> i64 {
    900
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file is optional.
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in.
            .add_source(config::File::with_name("config/local").required(false))
            // PARTERRE__AUTH__JWT_SECRET=... style environment overrides.
            .add_source(config::Environment::with_prefix("PARTERRE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
