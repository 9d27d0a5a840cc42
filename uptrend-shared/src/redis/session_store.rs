/// Refresh-token session store
///
/// The ephemeral half of the session model: Redis holds the single currently
/// valid refresh token per user under `refresh_token:<user_id>`, with a TTL
/// equal to the refresh token's signed lifetime. This is what makes logout
/// and re-login actually revoke previously issued refresh tokens; the JWT
/// signature alone cannot express revocation.
///
/// Semantics:
/// - `save` overwrites the slot (last write wins; concurrent logins are safe)
/// - `get` returns the pinned token for byte-for-byte comparison on refresh
/// - `delete` empties the slot on logout; a later refresh fails lookup
///
/// # Example
///
/// ```no_run
/// use uptrend_shared::redis::{RedisClient, RedisConfig, SessionStore};
/// use uuid::Uuid;
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = RedisClient::new(RedisConfig::from_env()?).await?;
/// let sessions = SessionStore::new(client);
///
/// let user_id = Uuid::new_v4();
/// sessions.save(user_id, "signed.refresh.token").await?;
/// assert_eq!(sessions.get(user_id).await?.as_deref(), Some("signed.refresh.token"));
/// sessions.delete(user_id).await?;
/// # Ok(())
/// # }
/// ```

use crate::auth::jwt::REFRESH_TOKEN_TTL_SECS;
use crate::redis::client::{RedisClient, RedisClientError};
use redis::AsyncCommands;
use uuid::Uuid;

/// Key prefix for refresh-token slots
const KEY_PREFIX: &str = "refresh_token:";

/// Builds the Redis key for a user's refresh-token slot
fn refresh_token_key(user_id: Uuid) -> String {
    format!("{}{}", KEY_PREFIX, user_id)
}

/// Session store backed by Redis
///
/// Cheap to clone; the underlying client is connection-managed and
/// thread-safe.
#[derive(Clone)]
pub struct SessionStore {
    client: RedisClient,
}

impl SessionStore {
    /// Creates a new session store on top of a connected Redis client
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Stores the refresh token for a user, overwriting any previous one
    ///
    /// The TTL matches the refresh token's lifetime so the slot and the
    /// signature expire together.
    pub async fn save(&self, user_id: Uuid, refresh_token: &str) -> Result<(), RedisClientError> {
        let mut conn = self.client.get_connection();
        conn.set_ex::<_, _, ()>(
            refresh_token_key(user_id),
            refresh_token,
            REFRESH_TOKEN_TTL_SECS,
        )
        .await?;
        Ok(())
    }

    /// Fetches the currently valid refresh token for a user, if any
    pub async fn get(&self, user_id: Uuid) -> Result<Option<String>, RedisClientError> {
        let mut conn = self.client.get_connection();
        let token: Option<String> = conn.get(refresh_token_key(user_id)).await?;
        Ok(token)
    }

    /// Deletes the refresh-token slot for a user
    ///
    /// Deleting a missing slot is not an error; logout is idempotent.
    pub async fn delete(&self, user_id: Uuid) -> Result<(), RedisClientError> {
        let mut conn = self.client.get_connection();
        conn.del::<_, ()>(refresh_token_key(user_id)).await?;
        Ok(())
    }

    /// Health check passthrough for the readiness endpoint
    pub async fn ping(&self) -> Result<bool, RedisClientError> {
        self.client.ping().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::redis::client::RedisConfig;

    #[test]
    fn test_key_format() {
        let id = Uuid::parse_str("6f3b9a1e-5c1d-4f7a-9c2b-1d2e3f4a5b6c").unwrap();
        assert_eq!(
            refresh_token_key(id),
            "refresh_token:6f3b9a1e-5c1d-4f7a-9c2b-1d2e3f4a5b6c"
        );
    }

    #[tokio::test]
    #[ignore] // Requires running Redis instance
    async fn test_save_get_delete_roundtrip() {
        let client = RedisClient::new(RedisConfig::from_url("redis://localhost:6379"))
            .await
            .unwrap();
        let store = SessionStore::new(client);
        let user_id = Uuid::new_v4();

        store.save(user_id, "token-a").await.unwrap();
        assert_eq!(store.get(user_id).await.unwrap().as_deref(), Some("token-a"));

        // Overwrite invalidates the previous token
        store.save(user_id, "token-b").await.unwrap();
        assert_eq!(store.get(user_id).await.unwrap().as_deref(), Some("token-b"));

        store.delete(user_id).await.unwrap();
        assert_eq!(store.get(user_id).await.unwrap(), None);

        // Deleting again is a no-op
        store.delete(user_id).await.unwrap();
    }
}
