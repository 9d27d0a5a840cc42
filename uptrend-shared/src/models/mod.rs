/// Database models for UpTrend
///
/// This module contains all database models and their CRUD operations.
/// The session subsystem owns a single durable entity: the user record.
/// Catalog, cart, and order data live in other services.
///
/// # Models
///
/// - `user`: User accounts, verification/reset token state, and roles
///
/// # Example
///
/// ```no_run
/// use uptrend_shared::models::user::{User, CreateUser};
/// use uptrend_shared::db::pool::{create_pool, DatabaseConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let new_user = CreateUser {
///     name: "Alice".to_string(),
///     email: "alice@example.com".to_string(),
///     password_hash: "$argon2id$...".to_string(),
///     avatar_url: None,
///     verification_token: Some("123456".to_string()),
///     verification_token_expires_at: Some(chrono::Utc::now()),
/// };
///
/// let user = User::create(&pool, new_user).await?;
/// # Ok(())
/// # }
/// ```

pub mod user;
