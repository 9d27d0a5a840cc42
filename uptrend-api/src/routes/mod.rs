/// Route handlers for the API server
///
/// This module organizes all HTTP route handlers:
/// - `health`: Health check endpoint
/// - `auth`: Signup, email verification, login/logout, token refresh,
///   password reset, and federated Google login

pub mod auth;
pub mod health;
