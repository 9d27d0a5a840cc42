//! # UpTrend Shared Library
//!
//! This crate contains the domain types and business logic shared by the
//! UpTrend API server and its tooling.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Token issuance, password hashing, one-shot tokens
//! - `db`: PostgreSQL pool and migrations
//! - `redis`: Redis client and refresh-token session store
//! - `mail`: Transactional email client

pub mod auth;
pub mod db;
pub mod mail;
pub mod models;
pub mod redis;

/// Current version of the UpTrend shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
