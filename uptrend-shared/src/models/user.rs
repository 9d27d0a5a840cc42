/// User model and database operations
///
/// This module provides the User model and the credential-store operations
/// the session controller depends on. Emails are normalized to lowercase
/// before they reach this layer and are unique across all records.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL UNIQUE,
///     password_hash VARCHAR(255) NOT NULL,
///     role user_role NOT NULL DEFAULT 'customer',
///     is_verified BOOLEAN NOT NULL DEFAULT FALSE,
///     avatar_url VARCHAR(512),
///     verification_token VARCHAR(16),
///     verification_token_expires_at TIMESTAMPTZ,
///     reset_password_token VARCHAR(64),
///     reset_password_expires_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     last_login_at TIMESTAMPTZ
/// );
/// ```
///
/// One-shot token fields (`verification_token`, `reset_password_token` and
/// their expiries) are present only while the corresponding flow is pending
/// and are cleared in the same statement that consumes them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular storefront customer
    Customer,

    /// Dashboard administrator
    Admin,
}

/// User model representing a storefront account
///
/// Passwords are stored as Argon2id hashes, never in plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address (lowercase, unique across all users)
    pub email: String,

    /// Argon2id password hash
    pub password_hash: String,

    /// Role, defaults to customer
    pub role: UserRole,

    /// Whether the email address has been verified
    pub is_verified: bool,

    /// Optional avatar/profile picture URL (set by federated login)
    pub avatar_url: Option<String>,

    /// Pending email verification code, if any
    pub verification_token: Option<String>,

    /// When the pending verification code expires
    pub verification_token_expires_at: Option<DateTime<Utc>>,

    /// Pending password reset token, if any
    pub reset_password_token: Option<String>,

    /// When the pending reset token expires
    pub reset_password_expires_at: Option<DateTime<Utc>>,

    /// When the user account was created
    pub created_at: DateTime<Utc>,

    /// When the user account was last updated
    pub updated_at: DateTime<Utc>,

    /// When the user last logged in (None if never logged in)
    pub last_login_at: Option<DateTime<Utc>>,
}

/// Input for creating a new user
///
/// New users always start unverified with a pending verification code.
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Display name
    pub name: String,

    /// Email address (already lowercase-normalized)
    pub email: String,

    /// Argon2id password hash (NOT the plaintext password!)
    pub password_hash: String,

    /// Optional avatar URL
    pub avatar_url: Option<String>,

    /// Pending verification code
    pub verification_token: Option<String>,

    /// Expiry of the pending verification code
    pub verification_token_expires_at: Option<DateTime<Utc>>,
}

const USER_COLUMNS: &str = "id, name, email, password_hash, role, is_verified, avatar_url, \
     verification_token, verification_token_expires_at, \
     reset_password_token, reset_password_expires_at, \
     created_at, updated_at, last_login_at";

impl User {
    /// Creates a new user in the database
    ///
    /// # Errors
    ///
    /// Returns an error if the email already exists (unique constraint
    /// violation) or the database is unreachable.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (name, email, password_hash, avatar_url,
                               verification_token, verification_token_expires_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.avatar_url)
        .bind(data.verification_token)
        .bind(data.verification_token_expires_at)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user by email address
    ///
    /// Emails are stored lowercase; callers normalize before lookup.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Finds a user with a pending, unexpired verification code
    ///
    /// The expiry check is part of the lookup so an expired code behaves
    /// exactly like a wrong one.
    pub async fn find_by_verification_code(
        pool: &PgPool,
        code: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE verification_token = $1
              AND verification_token_expires_at > NOW()
            "#,
        ))
        .bind(code)
        .fetch_optional(pool)
        .await
    }

    /// Marks a user as verified and consumes the verification code
    ///
    /// Clears both verification fields in the same statement, which is what
    /// makes the code one-shot: a second attempt no longer matches.
    pub async fn mark_verified(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET is_verified = TRUE,
                verification_token = NULL,
                verification_token_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Stores a pending password-reset token with its expiry
    pub async fn set_reset_token(
        pool: &PgPool,
        id: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET reset_password_token = $2,
                reset_password_expires_at = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(token)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Finds a user with a pending, unexpired reset token
    pub async fn find_by_reset_token(
        pool: &PgPool,
        token: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            SELECT {USER_COLUMNS} FROM users
            WHERE reset_password_token = $1
              AND reset_password_expires_at > NOW()
            "#,
        ))
        .bind(token)
        .fetch_optional(pool)
        .await
    }

    /// Replaces the password hash and consumes the reset token
    ///
    /// The caller hashes the new plaintext; this is the only save path that
    /// touches `password_hash` after signup.
    pub async fn reset_password(
        pool: &PgPool,
        id: Uuid,
        password_hash: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET password_hash = $2,
                reset_password_token = NULL,
                reset_password_expires_at = NULL,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#,
        ))
        .bind(id)
        .bind(password_hash)
        .fetch_optional(pool)
        .await
    }

    /// Updates the last login timestamp for a user
    ///
    /// Advisory only; called after successful authentication.
    pub async fn update_last_login(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Public projection of a user record
///
/// The only identity shape the API ever returns: no password hash, no
/// tokens, no one-shot fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    /// User ID
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address
    pub email: String,

    /// Role
    pub role: UserRole,

    /// Whether the email has been verified
    pub is_verified: bool,

    /// Avatar URL, if set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            is_verified: user.is_verified,
            avatar_url: user.avatar_url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_hides_sensitive_fields() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Customer,
            is_verified: false,
            avatar_url: None,
            verification_token: Some("123456".to_string()),
            verification_token_expires_at: Some(Utc::now()),
            reset_password_token: None,
            reset_password_expires_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_login_at: None,
        };

        let public = PublicUser::from(user.clone());
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["email"], "alice@example.com");
        assert_eq!(json["role"], "customer");
        assert_eq!(json["is_verified"], false);
        assert!(json.get("password_hash").is_none());
        assert!(json.get("verification_token").is_none());
        assert!(json.get("reset_password_token").is_none());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(
            serde_json::to_string(&UserRole::Customer).unwrap(),
            "\"customer\""
        );
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }
}
