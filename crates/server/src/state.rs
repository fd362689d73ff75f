//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::MerchConfig;
use crate::services::OidcClient;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: MerchConfig,
    pool: PgPool,
    oidc: OidcClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Server configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: MerchConfig, pool: PgPool) -> Self {
        let oidc = OidcClient::new(&config.oidc);

        Self {
            inner: Arc::new(AppStateInner { config, pool, oidc }),
        }
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &MerchConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the `OpenID` Connect client.
    #[must_use]
    pub fn oidc(&self) -> &OidcClient {
        &self.inner.oidc
    }
}
