//! # UpTrend API Server Library
//!
//! This library provides the core functionality for the UpTrend API server:
//! account signup with email verification, cookie-based sessions backed by
//! short-lived access tokens and Redis-pinned refresh tokens, password
//! reset, and federated Google login.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: Request body extraction
//! - `middleware`: Security headers
//! - `routes`: API route handlers
//! - `session`: Session cookie plumbing

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod session;
