/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - Test database setup (migrations applied on connect)
/// - Test Redis connection via the session store
/// - App construction with the real router
/// - Cookie plumbing helpers (Set-Cookie -> Cookie round trip)

use axum::body::Body;
use axum::http::{Request, Response};
use axum::response::Response as AxumResponse;
use serde_json::json;
use sqlx::PgPool;
use tower::Service as _;
use uptrend_api::app::{build_router, AppState};
use uptrend_api::config::Config;
use uptrend_shared::mail::{Mailer, MailerConfig};
use uptrend_shared::redis::{RedisClient, RedisConfig, SessionStore};
use uuid::Uuid;

/// Test context containing all necessary resources
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub config: Config,
    /// Emails created by this test, deleted on cleanup
    created_emails: Vec<String>,
}

impl TestContext {
    /// Creates a new test context against the live test database and Redis
    pub async fn new() -> anyhow::Result<Self> {
        let config = Config::from_env()?;

        let db = PgPool::connect(&config.database.url).await?;

        // Path relative to this crate's Cargo.toml
        sqlx::migrate!("../uptrend-shared/migrations").run(&db).await?;

        let redis = RedisClient::new(RedisConfig::from_url(&config.redis.url)).await?;
        let sessions = SessionStore::new(redis);

        let mailer = Mailer::new(MailerConfig {
            api_url: config.mail.api_url.clone(),
            api_token: config.mail.api_token.clone(),
            sender_email: config.mail.sender_email.clone(),
            sender_name: config.mail.sender_name.clone(),
        });

        let state = AppState::new(db.clone(), sessions, mailer, config.clone());
        let app = build_router(state);

        Ok(TestContext {
            db,
            app,
            config,
            created_emails: Vec::new(),
        })
    }

    /// Generates a unique test email and remembers it for cleanup
    pub fn unique_email(&mut self) -> String {
        let email = format!("test-{}@example.com", Uuid::new_v4());
        self.created_emails.push(email.clone());
        email
    }

    /// Sends a JSON POST and returns the response
    pub async fn post_json(
        &mut self,
        uri: &str,
        body: serde_json::Value,
        cookies: Option<&str>,
    ) -> anyhow::Result<AxumResponse> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");

        if let Some(cookies) = cookies {
            builder = builder.header("cookie", cookies);
        }

        let request = builder.body(Body::from(body.to_string()))?;
        Ok(self.app.call(request).await?)
    }

    /// Sends a GET and returns the response
    pub async fn get(&mut self, uri: &str, cookies: Option<&str>) -> anyhow::Result<AxumResponse> {
        let mut builder = Request::builder().method("GET").uri(uri);

        if let Some(cookies) = cookies {
            builder = builder.header("cookie", cookies);
        }

        let request = builder.body(Body::empty())?;
        Ok(self.app.call(request).await?)
    }

    /// Signs up a fresh user and returns (email, session cookies)
    pub async fn signup_user(&mut self, password: &str) -> anyhow::Result<(String, String)> {
        let email = self.unique_email();

        let response = self
            .post_json(
                "/auth/signup",
                json!({
                    "name": "Test User",
                    "email": email,
                    "password": password,
                }),
                None,
            )
            .await?;

        anyhow::ensure!(
            response.status() == axum::http::StatusCode::CREATED,
            "signup failed with {}",
            response.status()
        );

        let cookies = session_cookie_header(&response);
        Ok((email, cookies))
    }

    /// Reads the pending verification code straight from the database
    pub async fn verification_code_for(&self, email: &str) -> anyhow::Result<String> {
        let (code,): (Option<String>,) =
            sqlx::query_as("SELECT verification_token FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(&self.db)
                .await?;
        code.ok_or_else(|| anyhow::anyhow!("no pending verification code for {}", email))
    }

    /// Reads the pending reset token straight from the database
    pub async fn reset_token_for(&self, email: &str) -> anyhow::Result<String> {
        let (token,): (Option<String>,) =
            sqlx::query_as("SELECT reset_password_token FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(&self.db)
                .await?;
        token.ok_or_else(|| anyhow::anyhow!("no pending reset token for {}", email))
    }

    /// Cleans up test data
    pub async fn cleanup(&self) -> anyhow::Result<()> {
        for email in &self.created_emails {
            sqlx::query("DELETE FROM users WHERE email = $1")
                .bind(email)
                .execute(&self.db)
                .await?;
        }
        Ok(())
    }
}

/// Collapses a response's Set-Cookie headers into a Cookie header value
///
/// Keeps only `name=value` pairs; attributes (Path, Max-Age, HttpOnly)
/// are dropped the way a browser would when echoing cookies back.
pub fn session_cookie_header<B>(response: &Response<B>) -> String {
    response
        .headers()
        .get_all("set-cookie")
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter(|pair| {
            // Skip removal cookies (empty value)
            pair.split_once('=')
                .map(|(_, v)| !v.is_empty())
                .unwrap_or(false)
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parses a response body as JSON
pub async fn body_json(response: AxumResponse) -> anyhow::Result<serde_json::Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .map_err(|e| anyhow::anyhow!("failed to read response body: {}", e))?;
    Ok(serde_json::from_slice(&bytes)?)
}
