//! Integration tests for the merch store.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply the schema
//! docker compose up -d postgres
//! cargo run -p merch-cli -- migrate
//!
//! # Start the server
//! cargo run -p merch-server
//!
//! # Run integration tests (ignored by default)
//! cargo test -p merch-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog_api` - Public catalog endpoints over HTTP
//! - `auth_gating` - 401 behavior of session-protected endpoints
//! - `db_repositories` - Repository semantics straight against `PostgreSQL`
//!
//! HTTP tests target a running server (`MERCH_BASE_URL`, default
//! `http://localhost:5000`); repository tests connect with
//! `MERCH_DATABASE_URL`/`DATABASE_URL`. Both kinds are `#[ignore]`d so a
//! plain `cargo test` stays green without live services.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::time::{SystemTime, UNIX_EPOCH};

/// Base URL for the merch API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("MERCH_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Create an HTTP client with a cookie store, so session cookies stick.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique suffix for test data, so runs don't collide.
///
/// # Panics
///
/// Panics if the system clock is before the Unix epoch.
#[must_use]
pub fn unique_suffix() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before Unix epoch")
        .as_nanos();
    format!("{nanos}")
}
