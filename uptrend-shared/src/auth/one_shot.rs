/// One-shot token generation
///
/// A one-shot token is valid for exactly one successful use and is cleared
/// from the user record when consumed. Two kinds exist:
///
/// - **Verification code**: 6-digit numeric code mailed on signup, valid for
///   24 hours, consumed by the verify-email operation.
/// - **Reset token**: 20 random bytes hex-encoded, mailed as part of a reset
///   link, valid for 1 hour, consumed by the reset-password operation.
///
/// Matching is done in the credential store with the expiry check folded into
/// the lookup (`token = $1 AND expires_at > now()`), so an expired code and a
/// wrong code are indistinguishable to the caller.

use chrono::{DateTime, Duration, Utc};
use rand::{distributions::Alphanumeric, Rng};

/// Validity window for email verification codes
pub const VERIFICATION_CODE_TTL: Duration = Duration::hours(24);

/// Validity window for password reset tokens
pub const RESET_TOKEN_TTL: Duration = Duration::hours(1);

/// Generates a 6-digit numeric verification code
///
/// # Example
///
/// ```
/// use uptrend_shared::auth::one_shot::verification_code;
///
/// let code = verification_code();
/// assert_eq!(code.len(), 6);
/// assert!(code.chars().all(|c| c.is_ascii_digit()));
/// ```
pub fn verification_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

/// Expiry timestamp for a verification code issued now
pub fn verification_code_expiry() -> DateTime<Utc> {
    Utc::now() + VERIFICATION_CODE_TTL
}

/// Generates a random password-reset token (20 bytes, hex-encoded)
pub fn reset_token() -> String {
    let mut bytes = [0u8; 20];
    rand::thread_rng().fill(&mut bytes);
    hex::encode(bytes)
}

/// Expiry timestamp for a reset token issued now
pub fn reset_token_expiry() -> DateTime<Utc> {
    Utc::now() + RESET_TOKEN_TTL
}

/// Generates a random unusable password for federated signups
///
/// The plaintext is hashed and immediately discarded; it is never
/// communicated to the user, so federated accounts cannot log in with a
/// password until they go through the reset flow.
pub fn random_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(24)
        .map(char::from)
        .collect()
}
