//! `OpenID` Connect client.
//!
//! Implements the authorization-code flow against an external identity
//! provider (Auth0-shaped endpoint paths):
//!
//! 1. Generate the authorization URL with `authorization_url()`
//! 2. Redirect the browser to the provider's login page
//! 3. The provider redirects back with an authorization code
//! 4. Exchange the code for tokens with `exchange_code()`
//! 5. Fetch the identity assertion (subject + email) with `userinfo()`
//!
//! Token validation is delegated to the provider: identity claims come from
//! the userinfo endpoint over a server-to-server call with the freshly
//! issued access token, so no local JWT verification is performed.

use std::sync::Arc;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::config::OidcConfig;

/// Error talking to the identity provider.
#[derive(Debug, thiserror::Error)]
pub enum OidcError {
    /// Transport-level failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered, but not with what the flow needs.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Tokens issued by the provider after a code exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenSet {
    /// Bearer token for the userinfo call.
    pub access_token: String,
    /// ID token, kept for RP-initiated logout.
    pub id_token: Option<String>,
    /// Lifetime in seconds, as reported by the provider.
    pub expires_in: Option<i64>,
    /// Unix timestamp when the token was obtained.
    pub obtained_at: i64,
}

/// Identity assertion from the userinfo endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityClaims {
    /// Stable subject identifier.
    pub sub: String,
    /// Asserted email address, when the `email` scope was granted.
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    id_token: Option<String>,
    expires_in: Option<i64>,
}

/// Client for the `OpenID` Connect provider.
#[derive(Clone)]
pub struct OidcClient {
    inner: Arc<OidcClientInner>,
}

struct OidcClientInner {
    client: reqwest::Client,
    issuer_url: String,
    client_id: String,
    client_secret: String,
}

impl OidcClient {
    /// Create a new `OpenID` Connect client.
    #[must_use]
    pub fn new(config: &OidcConfig) -> Self {
        Self {
            inner: Arc::new(OidcClientInner {
                client: reqwest::Client::new(),
                issuer_url: config.issuer_url.clone(),
                client_id: config.client_id.clone(),
                client_secret: config.client_secret.expose_secret().to_string(),
            }),
        }
    }

    /// Get the OAuth client ID (safe to expose in redirects).
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.inner.client_id
    }

    // ─────────────────────────────────────────────────────────────────────
    // OAuth Flow
    // ─────────────────────────────────────────────────────────────────────

    /// Generate the authorization URL for login.
    ///
    /// # Arguments
    ///
    /// * `redirect_uri` - The callback URL to redirect to after authentication
    /// * `state` - A random string stored in the session to prevent CSRF attacks
    /// * `nonce` - A random string for `OpenID` Connect replay protection
    #[must_use]
    pub fn authorization_url(&self, redirect_uri: &str, state: &str, nonce: &str) -> String {
        format!(
            "{}/authorize?\
            client_id={}&\
            response_type=code&\
            redirect_uri={}&\
            scope=openid%20email&\
            state={}&\
            nonce={}",
            self.inner.issuer_url,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(state),
            urlencoding::encode(nonce)
        )
    }

    /// Generate the provider logout URL.
    ///
    /// # Arguments
    ///
    /// * `return_to` - Where the provider should redirect after logout
    #[must_use]
    pub fn logout_url(&self, return_to: &str) -> String {
        format!(
            "{}/v2/logout?client_id={}&returnTo={}",
            self.inner.issuer_url,
            urlencoding::encode(&self.inner.client_id),
            urlencoding::encode(return_to)
        )
    }

    /// Exchange an authorization code for tokens.
    ///
    /// # Arguments
    ///
    /// * `code` - The authorization code from the OAuth callback
    /// * `redirect_uri` - The same redirect URI used in the authorization request
    ///
    /// # Errors
    ///
    /// Returns an error if the token exchange fails.
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<TokenSet, OidcError> {
        let url = format!("{}/oauth/token", self.inner.issuer_url);

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", &self.inner.client_id),
            ("client_secret", &self.inner.client_secret),
            ("code", code),
            ("redirect_uri", redirect_uri),
        ];

        let response = self.inner.client.post(&url).form(&params).send().await?;

        if !response.status().is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(OidcError::Protocol(format!("token exchange failed: {text}")));
        }

        let token_response: TokenResponse = response.json().await?;

        Ok(TokenSet {
            access_token: token_response.access_token,
            id_token: token_response.id_token,
            expires_in: token_response.expires_in,
            obtained_at: chrono::Utc::now().timestamp(),
        })
    }

    /// Fetch the identity assertion for an access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the userinfo request fails or the response does
    /// not carry the expected claims.
    pub async fn userinfo(&self, access_token: &str) -> Result<IdentityClaims, OidcError> {
        let url = format!("{}/userinfo", self.inner.issuer_url);

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(OidcError::Protocol(format!(
                "userinfo request failed ({status}): {text}"
            )));
        }

        Ok(response.json().await?)
    }
}
