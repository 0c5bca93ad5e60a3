use std::net::SocketAddr;
use std::sync::Arc;

use parterre_api::mailer::Mailer;
use parterre_api::state::{AppState, AuthSettings};
use parterre_api::{app, worker};
use parterre_core::{EngineConfig, ReservationEngine};
use parterre_store::{DbClient, RedisClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parterre_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = parterre_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Parterre API on port {}", config.server.port);

    let redis = Arc::new(
        RedisClient::new(&config.redis.url)
            .await
            .expect("Failed to connect to Redis"),
    );

    let db = Arc::new(
        DbClient::new(&config.database.url)
            .await
            .expect("Failed to connect to Postgres"),
    );
    db.migrate().await.expect("Failed to run migrations");

    let engine = Arc::new(ReservationEngine::new(
        redis.clone(),
        db.clone(),
        EngineConfig {
            hold_seconds: config.business_rules.hold_seconds,
            receipt_ttl_seconds: config.business_rules.receipt_ttl_seconds,
        },
    ));
    engine.seed_seats().await.expect("Failed to seed seats");

    tokio::spawn(worker::start_reconciliation_worker(engine.clone(), 30));

    let state = AppState {
        redis,
        db,
        engine,
        mailer: Arc::new(Mailer::new(config.email.clone())),
        auth: AuthSettings {
            secret: config.auth.jwt_secret.clone(),
            expiration_seconds: config.auth.jwt_expiration_seconds,
        },
        rules: config.business_rules.clone(),
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
