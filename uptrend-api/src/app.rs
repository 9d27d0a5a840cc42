/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// The state is the explicit dependency context for the session controller:
/// database pool, refresh-token store, mailer, and configuration are
/// constructed once at startup and injected here, with no module-level globals.
///
/// # Example
///
/// ```no_run
/// use uptrend_api::{app::AppState, config::Config};
/// use uptrend_shared::mail::{Mailer, MailerConfig};
/// use uptrend_shared::redis::{RedisClient, RedisConfig, SessionStore};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let db = PgPool::connect(&config.database.url).await?;
/// let redis = RedisClient::new(RedisConfig::from_url(&config.redis.url)).await?;
/// let mailer = Mailer::new(MailerConfig {
///     api_url: config.mail.api_url.clone(),
///     api_token: config.mail.api_token.clone(),
///     sender_email: config.mail.sender_email.clone(),
///     sender_name: config.mail.sender_name.clone(),
/// });
/// let state = AppState::new(db, SessionStore::new(redis), mailer, config);
/// let app = uptrend_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    error::ApiError,
    middleware::security::SecurityHeadersLayer,
    session::ACCESS_COOKIE,
};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use uptrend_shared::auth::jwt;
use uptrend_shared::mail::Mailer;
use uptrend_shared::redis::SessionStore;
use uuid::Uuid;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// All members are cheap to clone (pools, connection managers, Arc).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (credential store)
    pub db: PgPool,

    /// Refresh-token session store (ephemeral token store)
    pub sessions: SessionStore,

    /// Transactional email client (notification gateway)
    pub mailer: Mailer,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, sessions: SessionStore, mailer: Mailer, config: Config) -> Self {
        Self {
            db,
            sessions,
            mailer,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Whether cookies should carry the Secure flag
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Authenticated user identity injected into request extensions
/// by [`access_auth_layer`]
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// User ID from the validated access token
    pub id: Uuid,
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                        # Health check (public)
/// └── /auth/
///     ├── POST /signup
///     ├── POST /verify-email
///     ├── POST /login
///     ├── POST /logout
///     ├── POST /refresh-token
///     ├── POST /forgot-password
///     ├── POST /reset-password/:token
///     ├── POST /google-auth
///     └── GET  /get-profile          # Requires access cookie
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (credentialed, origin-restricted in production)
/// 3. Security headers
/// 4. Access-cookie authentication (profile route only)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Session controller surface (public; the handlers own their own
    // token checks since most of them establish the session)
    let auth_routes = Router::new()
        .route("/signup", post(routes::auth::signup))
        .route("/verify-email", post(routes::auth::verify_email))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/refresh-token", post(routes::auth::refresh_token))
        .route("/forgot-password", post(routes::auth::forgot_password))
        .route("/reset-password/:token", post(routes::auth::reset_password))
        .route("/google-auth", post(routes::auth::google_auth));

    // Routes that require a valid access cookie
    let profile_routes = Router::new()
        .route("/get-profile", get(routes::auth::get_profile))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            access_auth_layer,
        ));

    // Session cookies mean credentialed CORS: the wildcard shortcut is
    // rejected by browsers, so development mirrors the request origin.
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::very_permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes.merge(profile_routes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Access-cookie authentication middleware
///
/// Extracts and validates the access token from the `accessToken` cookie,
/// then injects [`AuthUser`] into request extensions.
async fn access_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let jar = CookieJar::from_headers(req.headers());

    let token = jar
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let claims = jwt::validate_access_token(&token, state.jwt_secret())?;

    req.extensions_mut().insert(AuthUser { id: claims.sub });

    Ok(next.run(req).await)
}
