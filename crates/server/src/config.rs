//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `MERCH_DATABASE_URL` - `PostgreSQL` connection string
//! - `MERCH_BASE_URL` - Public URL for the store
//! - `MERCH_SESSION_SECRET` - Session signing secret (min 32 chars)
//! - `OIDC_ISSUER_URL` - Base URL of the `OpenID` Connect identity provider
//! - `OIDC_CLIENT_ID` - OAuth client ID registered with the provider
//! - `OIDC_CLIENT_SECRET` - OAuth client secret
//!
//! ## Optional
//! - `MERCH_HOST` - Bind address (default: 127.0.0.1)
//! - `MERCH_PORT` - Listen port (default: 5000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Merch store application configuration.
#[derive(Debug, Clone)]
pub struct MerchConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the store
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// `OpenID` Connect provider configuration
    pub oidc: OidcConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

/// `OpenID` Connect provider configuration.
///
/// Implements `Debug` manually to redact the client secret.
#[derive(Clone)]
pub struct OidcConfig {
    /// Provider base URL (e.g., <https://tenant.us.auth0.com>), no trailing slash
    pub issuer_url: String,
    /// OAuth client ID (safe to expose in redirects)
    pub client_id: String,
    /// OAuth client secret (server-side only)
    pub client_secret: SecretString,
}

impl std::fmt::Debug for OidcConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OidcConfig")
            .field("issuer_url", &self.issuer_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl MerchConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("MERCH_DATABASE_URL")?;
        let host = get_env_or_default("MERCH_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("MERCH_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("MERCH_PORT", "5000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("MERCH_PORT".to_string(), e.to_string()))?;
        let base_url = get_required_env("MERCH_BASE_URL")?;
        let session_secret = get_required_secret("MERCH_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "MERCH_SESSION_SECRET")?;

        let oidc = OidcConfig::from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            oidc,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl OidcConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let issuer_url = get_required_env("OIDC_ISSUER_URL")?
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            issuer_url,
            client_id: get_required_env("OIDC_CLIENT_ID")?,
            client_secret: get_required_secret("OIDC_CLIENT_SECRET")?,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}
