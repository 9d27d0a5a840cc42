/// Redis integration for the ephemeral token store
///
/// This module provides production-grade Redis integration including:
/// - Connection pooling with automatic reconnection
/// - Health checks (PING)
/// - The refresh-token session store
///
/// # Architecture
///
/// ```text
/// ┌─────────────┐
/// │  API server │ ──SET EX 7d──> refresh_token:{user_id}
/// └─────────────┘ ──GET────────> refresh_token:{user_id}   (refresh)
///                 ──DEL────────> refresh_token:{user_id}   (logout)
/// ```
///
/// At most one refresh token per user is valid at any time: a new login
/// overwrites the slot, logout deletes it, and the TTL matches the refresh
/// token's signed lifetime.
///
/// # Example
///
/// ```no_run
/// use uptrend_shared::redis::{RedisClient, RedisConfig, SessionStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = RedisConfig::from_env()?;
/// let client = RedisClient::new(config).await?;
/// let sessions = SessionStore::new(client);
///
/// let healthy = sessions.ping().await?;
/// println!("Redis healthy: {}", healthy);
/// # Ok(())
/// # }
/// ```

pub mod client;
pub mod session_store;

// Re-export common types for convenience
pub use client::{RedisClient, RedisClientError, RedisConfig};
pub use session_store::SessionStore;
