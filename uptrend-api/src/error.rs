/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>` which automatically converts
/// to the appropriate status code, so error translation happens in exactly
/// one place. Dependency failures (database, Redis, mail provider, hashing)
/// convert into `ApiError` at the call seam and render as opaque 500s;
/// details are logged server-side only.
///
/// Status mapping follows the public API contract: duplicate email and bad
/// credentials are 400s (not 409/401), missing or invalid session tokens
/// are 401s, unknown resources are 404s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed or missing input (400)
    BadRequest(String),

    /// Field-level validation failures (400)
    Validation(Vec<ValidationErrorDetail>),

    /// Duplicate email on signup (400)
    Conflict(String),

    /// Wrong email or password (400); never reveals which
    InvalidCredentials,

    /// One-shot token mismatch or expiry (400); never reveals which
    InvalidOrExpired(String),

    /// Missing, invalid, or replayed session token (401)
    Unauthorized(String),

    /// Resource not found (404)
    NotFound(String),

    /// Unexpected dependency failure (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// Optional validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// Converts validator output into a field-level validation error
    pub fn from_validation(errors: validator::ValidationErrors) -> Self {
        let details: Vec<ValidationErrorDetail> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::Validation(details)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Validation(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InvalidCredentials => write!(f, "Invalid email or password"),
            ApiError::InvalidOrExpired(msg) => write!(f, "Invalid or expired: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message, details) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                "Request validation failed".to_string(),
                Some(errors),
            ),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", msg, None),
            ApiError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                "invalid_credentials",
                "Invalid email or password".to_string(),
                None,
            ),
            ApiError::InvalidOrExpired(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_or_expired", msg, None)
            }
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg, None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Convert JSON body rejections to API errors
///
/// Missing fields, malformed JSON, and wrong content types are all input
/// problems, so they render as 400s rather than axum's stock 422/415.
impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

/// Convert sqlx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                // Unique violation on email: the signup pre-check lost a race
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict("User already exists".to_string());
                    }
                    return ApiError::InternalError(format!(
                        "Constraint violation: {}",
                        constraint
                    ));
                }

                ApiError::InternalError(format!("Database error: {}", db_err))
            }
            _ => ApiError::InternalError(format!("Database error: {}", err)),
        }
    }
}

/// Convert JWT errors to API errors
///
/// Any token problem on an authenticated surface renders as 401; the
/// distinction between expired/malformed/wrong-type stays server-side.
impl From<uptrend_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: uptrend_shared::auth::jwt::JwtError) -> Self {
        match err {
            uptrend_shared::auth::jwt::JwtError::Expired => {
                ApiError::Unauthorized("Token expired".to_string())
            }
            uptrend_shared::auth::jwt::JwtError::CreateError(msg) => ApiError::InternalError(msg),
            _ => ApiError::Unauthorized("Invalid token".to_string()),
        }
    }
}

/// Convert password errors to API errors
impl From<uptrend_shared::auth::password::PasswordError> for ApiError {
    fn from(err: uptrend_shared::auth::password::PasswordError) -> Self {
        ApiError::InternalError(format!("Password operation failed: {}", err))
    }
}

/// Convert Redis errors to API errors
impl From<uptrend_shared::redis::RedisClientError> for ApiError {
    fn from(err: uptrend_shared::redis::RedisClientError) -> Self {
        ApiError::InternalError(format!("Session store error: {}", err))
    }
}

/// Convert mail errors to API errors
///
/// Handlers usually log mail failures instead of propagating them; this
/// impl exists for the paths where delivery is the operation itself.
impl From<uptrend_shared::mail::MailerError> for ApiError {
    fn from(err: uptrend_shared::mail::MailerError) -> Self {
        ApiError::InternalError(format!("Mail delivery failed: {}", err))
    }
}
