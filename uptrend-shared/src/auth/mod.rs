/// Authentication primitives for UpTrend
///
/// This module provides the secure building blocks of the session subsystem:
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Access/refresh token issuance and validation
/// - [`one_shot`]: Single-use verification codes and reset tokens
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing, 15-minute access / 7-day refresh lifetimes
/// - **One-shot Tokens**: OS-RNG generated, fixed validity windows, consumed on use
/// - **Constant-time Comparison**: All verification uses constant-time operations
///
/// # Example
///
/// ```no_run
/// use uptrend_shared::auth::password::{hash_password, verify_password};
/// use uptrend_shared::auth::jwt::issue_token_pair;
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// // Password authentication
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// // Session token issuance
/// let pair = issue_token_pair(Uuid::new_v4(), "secret-key-at-least-32-bytes-long")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod one_shot;
pub mod password;
