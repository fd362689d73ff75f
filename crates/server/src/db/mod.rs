//! Database operations for the merch store `PostgreSQL` database.
//!
//! # Tables
//!
//! - `products` - Catalog (read-only from this service)
//! - `product_reviews` - Customer reviews, insert-only
//! - `users` - Local identity rows keyed by OIDC subject
//! - `cart_items` - Per-user cart lines, one row per (user, product)
//! - `orders` / `order_items` - Placed orders and their captured line prices
//! - `tower_sessions.session` - Session storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p merch-cli -- migrate
//! ```
//!
//! Queries use the runtime-checked sqlx API; repositories borrow the shared
//! [`PgPool`] and acquire a connection per statement, releasing it on every
//! exit path.

mod carts;
mod orders;
mod products;
mod users;

pub use carts::CartRepository;
pub use orders::OrderRepository;
pub use products::ProductRepository;
pub use users::UserRepository;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Error type shared by all repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A row that must exist after a successful write was not found.
    #[error("storage inconsistency: {0}")]
    Inconsistent(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
