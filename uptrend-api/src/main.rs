//! # UpTrend API Server
//!
//! Session and authentication service for the UpTrend storefront.
//!
//! ## Architecture
//!
//! The API server is built with Axum and provides:
//! - Signup with mailed 6-digit verification codes
//! - Cookie-based sessions (15m access / 7d refresh JWTs)
//! - Refresh-token revocation via a per-user Redis slot
//! - Password reset over one-shot mailed tokens
//! - Federated Google login
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p uptrend-api
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uptrend_api::{
    app::{build_router, AppState},
    config::Config,
};
use uptrend_shared::{
    db::{migrations::run_migrations, pool::create_pool, pool::DatabaseConfig},
    mail::{Mailer, MailerConfig},
    redis::{RedisClient, RedisConfig, SessionStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uptrend_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "UpTrend API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    // Database pool + migrations
    let db = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..DatabaseConfig::default()
    })
    .await?;
    run_migrations(&db).await?;
    tracing::info!("Database connected and migrations applied");

    // Redis-backed session store
    let redis = RedisClient::new(RedisConfig::from_url(&config.redis.url)).await?;
    let sessions = SessionStore::new(redis);
    tracing::info!("Session store connected");

    // Outbound mail
    let mailer = Mailer::new(MailerConfig {
        api_url: config.mail.api_url.clone(),
        api_token: config.mail.api_token.clone(),
        sender_email: config.mail.sender_email.clone(),
        sender_name: config.mail.sender_name.clone(),
    });

    let bind_address = config.bind_address();
    let state = AppState::new(db.clone(), sessions, mailer, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool...");
    uptrend_shared::db::pool::close_pool(db).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install shutdown handler: {}", e);
    }
}
