/// Session controller: signup, verification, login, logout, refresh,
/// password reset, and federated Google login
///
/// All handlers speak JSON and carry the session in cookies. The state
/// machine behind them is small: a user record in Postgres (credential
/// store, one-shot tokens) plus one Redis slot per user holding the
/// currently valid refresh token. Everything that issues a session goes
/// through `establish_session`, so cookie flags and the Redis slot can
/// never drift apart.
///
/// Error-shape rules the handlers follow:
/// - login collapses unknown email and wrong password into one message
/// - one-shot token failures never say whether the token was wrong or late
/// - logout succeeds no matter what state the presented tokens are in

use crate::{
    app::{AppState, AuthUser},
    error::{ApiError, ApiResult},
    extract::JsonBody,
    session::{clear_session_cookies, set_access_cookie, set_session_cookies, REFRESH_COOKIE},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use uptrend_shared::auth::{jwt, one_shot, password};
use uptrend_shared::models::user::{CreateUser, PublicUser, User};
use validator::Validate;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Signup request
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Display name
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Plaintext password (hashed before storage)
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Email verification request
#[derive(Debug, Deserialize, Validate)]
pub struct VerifyEmailRequest {
    /// 6-digit verification code from the signup email
    #[validate(length(equal = 6, message = "Verification code must be 6 digits"))]
    pub code: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Plaintext password
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Forgot-password request
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address to send the reset link to
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
}

/// Reset-password request (token travels in the path)
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// New plaintext password
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Federated Google login request
///
/// The storefront completes the Google OAuth dance and posts the profile
/// here. First-time accounts still go through email verification.
#[derive(Debug, Deserialize, Validate)]
pub struct GoogleAuthRequest {
    /// Display name from the Google profile
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    /// Email address from the Google profile
    #[validate(email(message = "Invalid email address"))]
    pub email: String,

    /// Avatar URL from the Google profile
    #[validate(url(message = "Invalid avatar URL"))]
    pub avatar_url: Option<String>,
}

/// Response carrying a message and the public user projection
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Human-readable outcome
    pub message: String,

    /// The affected user, public fields only
    pub user: PublicUser,
}

/// Message-only response
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable outcome
    pub message: String,
}

// ---------------------------------------------------------------------------
// Shared session plumbing
// ---------------------------------------------------------------------------

/// Issues a token pair, pins the refresh token in the session store, and
/// sets both cookies
///
/// Every path that starts a session (signup, login, google-auth) funnels
/// through here; re-login overwrites the Redis slot, which revokes the
/// previously issued refresh token.
async fn establish_session(
    state: &AppState,
    jar: CookieJar,
    user_id: uuid::Uuid,
) -> ApiResult<CookieJar> {
    let pair = jwt::issue_token_pair(user_id, state.jwt_secret())?;
    state.sessions.save(user_id, &pair.refresh_token).await?;

    Ok(set_session_cookies(jar, &pair, state.secure_cookies()))
}

/// Lowercases and trims an email address
///
/// All storage and lookups use the normalized form, which is what makes
/// the unique constraint case-insensitive in practice.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/signup
///
/// Creates an unverified account, mails a 6-digit verification code, and
/// starts a session immediately. Duplicate email is a 400.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<SignupRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    request.validate().map_err(ApiError::from_validation)?;

    let email = normalize_email(&request.email);

    if User::find_by_email(&state.db, &email).await?.is_some() {
        return Err(ApiError::Conflict("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&request.password)?;
    let code = one_shot::verification_code();

    let user = User::create(
        &state.db,
        CreateUser {
            name: request.name,
            email: email.clone(),
            password_hash,
            avatar_url: None,
            verification_token: Some(code.clone()),
            verification_token_expires_at: Some(one_shot::verification_code_expiry()),
        },
    )
    .await?;

    let jar = establish_session(&state, jar, user.id).await?;

    // Best effort: the account exists and the session is live either way
    if let Err(e) = state.mailer.send_verification_email(&email, &code).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to send verification email");
    }

    tracing::info!(user_id = %user.id, "User signed up");

    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            message: "User created successfully".to_string(),
            user: user.into(),
        }),
    ))
}

/// POST /auth/verify-email
///
/// Consumes a pending verification code. Wrong and expired codes are
/// indistinguishable; success clears the code so replays fail.
pub async fn verify_email(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<VerifyEmailRequest>,
) -> ApiResult<Json<AuthResponse>> {
    request.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_verification_code(&state.db, &request.code)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidOrExpired("Invalid or expired verification code".to_string())
        })?;

    let user = User::mark_verified(&state.db, user.id)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidOrExpired("Invalid or expired verification code".to_string())
        })?;

    if let Err(e) = state.mailer.send_welcome_email(&user.email, &user.name).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to send welcome email");
    }

    tracing::info!(user_id = %user.id, "Email verified");

    Ok(Json(AuthResponse {
        message: "Email verified successfully".to_string(),
        user: user.into(),
    }))
}

/// POST /auth/login
///
/// Verifies credentials and starts a session. Unknown email and wrong
/// password produce the identical 400 response.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<LoginRequest>,
) -> ApiResult<(CookieJar, Json<AuthResponse>)> {
    request.validate().map_err(ApiError::from_validation)?;

    let email = normalize_email(&request.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&request.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let jar = establish_session(&state, jar, user.id).await?;

    if let Err(e) = User::update_last_login(&state.db, user.id).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to update last login timestamp");
    }

    tracing::info!(user_id = %user.id, "User logged in");

    Ok((
        jar,
        Json(AuthResponse {
            message: "Logged in successfully".to_string(),
            user: user.into(),
        }),
    ))
}

/// POST /auth/logout
///
/// Empties the Redis slot (when the refresh cookie names a user) and
/// clears both cookies. Always succeeds: missing, expired, or garbage
/// tokens still end with a clean client.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    if let Some(cookie) = jar.get(REFRESH_COOKIE) {
        match jwt::validate_refresh_token(cookie.value(), state.jwt_secret()) {
            Ok(claims) => {
                if let Err(e) = state.sessions.delete(claims.sub).await {
                    tracing::warn!(user_id = %claims.sub, error = %e, "Failed to clear session slot");
                } else {
                    tracing::info!(user_id = %claims.sub, "User logged out");
                }
            }
            Err(e) => {
                // Cookie present but unusable; still clear it client-side
                tracing::debug!(error = %e, "Logout with invalid refresh token");
            }
        }
    }

    Ok((
        clear_session_cookies(jar),
        Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }),
    ))
}

/// POST /auth/refresh-token
///
/// Mints a new access token from a valid refresh token. The presented
/// token must match the Redis slot byte-for-byte; a logged-out or
/// superseded token fails here even with a valid signature.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> ApiResult<(CookieJar, Json<MessageResponse>)> {
    let presented = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or_else(|| ApiError::Unauthorized("No refresh token provided".to_string()))?;

    let claims = jwt::validate_refresh_token(&presented, state.jwt_secret())?;

    let stored = state.sessions.get(claims.sub).await?;
    if stored.as_deref() != Some(presented.as_str()) {
        return Err(ApiError::Unauthorized("Invalid refresh token".to_string()));
    }

    let access = jwt::refresh_access_token(&presented, state.jwt_secret())?;
    let jar = set_access_cookie(jar, access, state.secure_cookies());

    tracing::debug!(user_id = %claims.sub, "Access token refreshed");

    Ok((
        jar,
        Json(MessageResponse {
            message: "Token refreshed successfully".to_string(),
        }),
    ))
}

/// POST /auth/forgot-password
///
/// Stores a one-hour reset token and mails a reset link. Unknown emails
/// get a 404; the storefront shows the same "check your email" screen
/// either way.
pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ForgotPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    request.validate().map_err(ApiError::from_validation)?;

    let email = normalize_email(&request.email);

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let token = one_shot::reset_token();
    User::set_reset_token(&state.db, user.id, &token, one_shot::reset_token_expiry()).await?;

    let reset_url = format!("{}/reset-password/{}", state.config.client_url, token);
    if let Err(e) = state.mailer.send_password_reset_email(&email, &reset_url).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to send password reset email");
    }

    tracing::info!(user_id = %user.id, "Password reset requested");

    Ok(Json(MessageResponse {
        message: "Password reset link sent to your email".to_string(),
    }))
}

/// POST /auth/reset-password/:token
///
/// Consumes a pending reset token and replaces the password hash. The
/// token is cleared in the same statement, so a reset link works once.
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    JsonBody(request): JsonBody<ResetPasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    request.validate().map_err(ApiError::from_validation)?;

    let user = User::find_by_reset_token(&state.db, &token)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidOrExpired("Invalid or expired reset token".to_string())
        })?;

    let password_hash = password::hash_password(&request.password)?;
    User::reset_password(&state.db, user.id, &password_hash)
        .await?
        .ok_or_else(|| {
            ApiError::InvalidOrExpired("Invalid or expired reset token".to_string())
        })?;

    if let Err(e) = state.mailer.send_password_reset_success(&user.email).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to send reset confirmation email");
    }

    tracing::info!(user_id = %user.id, "Password reset completed");

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}

/// POST /auth/google-auth
///
/// Upserts a user keyed on the Google email and starts a session. Existing
/// accounts log in (200); new ones are created with an unusable random
/// password and enter the same pending-verification state as signup (201),
/// code mailed and all.
pub async fn google_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(request): JsonBody<GoogleAuthRequest>,
) -> ApiResult<(StatusCode, CookieJar, Json<AuthResponse>)> {
    request.validate().map_err(ApiError::from_validation)?;

    let email = normalize_email(&request.email);

    let (status, user) = match User::find_by_email(&state.db, &email).await? {
        Some(user) => (StatusCode::OK, user),
        None => {
            // The account has no usable password until the owner runs the
            // reset flow; the random plaintext is hashed and discarded.
            let password_hash = password::hash_password(&one_shot::random_password())?;
            let code = one_shot::verification_code();

            let user = User::create(
                &state.db,
                CreateUser {
                    name: request.name,
                    email: email.clone(),
                    password_hash,
                    avatar_url: request.avatar_url,
                    verification_token: Some(code.clone()),
                    verification_token_expires_at: Some(one_shot::verification_code_expiry()),
                },
            )
            .await?;

            if let Err(e) = state.mailer.send_verification_email(&email, &code).await {
                tracing::warn!(user_id = %user.id, error = %e, "Failed to send verification email");
            }

            tracing::info!(user_id = %user.id, "User created via Google login");
            (StatusCode::CREATED, user)
        }
    };

    let jar = establish_session(&state, jar, user.id).await?;

    if let Err(e) = User::update_last_login(&state.db, user.id).await {
        tracing::warn!(user_id = %user.id, error = %e, "Failed to update last login timestamp");
    }

    Ok((
        status,
        jar,
        Json(AuthResponse {
            message: "Logged in successfully".to_string(),
            user: user.into(),
        }),
    ))
}

/// GET /auth/get-profile
///
/// Returns the authenticated user's public profile. Identity comes from
/// the access-cookie middleware.
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<AuthResponse>> {
    let user = User::find_by_id(&state.db, auth.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(AuthResponse {
        message: "Profile fetched successfully".to_string(),
        user: user.into(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Alice@Example.COM "), "alice@example.com");
        assert_eq!(normalize_email("bob@shop.io"), "bob@shop.io");
    }

    #[test]
    fn test_signup_request_validation() {
        let valid = SignupRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(valid.validate().is_ok());

        let bad_email = SignupRequest {
            name: "Alice".to_string(),
            email: "not-an-email".to_string(),
            password: "secret123".to_string(),
        };
        assert!(bad_email.validate().is_err());

        let short_password = SignupRequest {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "abc".to_string(),
        };
        assert!(short_password.validate().is_err());

        let empty_name = SignupRequest {
            name: "".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret123".to_string(),
        };
        assert!(empty_name.validate().is_err());
    }

    #[test]
    fn test_verify_email_request_validation() {
        assert!(VerifyEmailRequest {
            code: "123456".to_string()
        }
        .validate()
        .is_ok());

        assert!(VerifyEmailRequest {
            code: "12345".to_string()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_google_auth_request_validation() {
        let valid = GoogleAuthRequest {
            name: "Alice".to_string(),
            email: "alice@gmail.com".to_string(),
            avatar_url: Some("https://lh3.googleusercontent.com/a/photo".to_string()),
        };
        assert!(valid.validate().is_ok());

        let no_avatar = GoogleAuthRequest {
            name: "Alice".to_string(),
            email: "alice@gmail.com".to_string(),
            avatar_url: None,
        };
        assert!(no_avatar.validate().is_ok());

        let bad_avatar = GoogleAuthRequest {
            name: "Alice".to_string(),
            email: "alice@gmail.com".to_string(),
            avatar_url: Some("not a url".to_string()),
        };
        assert!(bad_avatar.validate().is_err());
    }
}
