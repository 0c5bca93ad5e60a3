use std::sync::Arc;

use parterre_core::ReservationEngine;
use parterre_store::app_config::BusinessRules;
use parterre_store::{DbClient, RedisClient};

use crate::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub redis: Arc<RedisClient>,
    pub db: Arc<DbClient>,
    pub engine: Arc<ReservationEngine>,
    pub mailer: Arc<Mailer>,
    pub auth: AuthSettings,
    pub rules: BusinessRules,
}

#[derive(Clone)]
pub struct AuthSettings {
    pub secret: String,
    pub expiration_seconds: u64,
}
