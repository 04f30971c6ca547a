//! # signup Shared Library
//!
//! Types and persistence used by the signup API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing
//! - `db`: Connection pool and migrations
//! - `store`: The `UserStore` port with PostgreSQL and in-memory adapters

pub mod auth;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the signup shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
