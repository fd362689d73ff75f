//! `OpenID` Connect auth route handlers.
//!
//! Handles the delegated login flow:
//! - Login: redirects to the provider's authorization page
//! - Callback: validates state, exchanges the code, fetches the identity
//!   assertion, and stores it in the session
//! - Logout: clears the session identity and redirects to provider logout

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use rand::Rng;
use serde::Deserialize;
use tower_sessions::Session;

use merch_core::Email;

use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Query parameters from the OAuth callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    /// Authorization code to exchange for tokens.
    pub code: Option<String>,
    /// State parameter for CSRF protection.
    pub state: Option<String>,
    /// Error code if authorization failed.
    pub error: Option<String>,
    /// Error description.
    pub error_description: Option<String>,
}

/// Generate a cryptographically secure random string.
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| {
            let idx = rng.random_range(0..CHARSET.len());
            // SAFETY: idx is always within bounds since random_range returns 0..CHARSET.len()
            char::from(*CHARSET.get(idx).expect("idx within bounds"))
        })
        .collect()
}

/// Initiate login with the identity provider.
///
/// Generates state and nonce parameters, stores them in the session,
/// and redirects to the provider's authorization page.
///
/// # Route
///
/// `GET /auth/login`
pub async fn login(State(state): State<AppState>, session: Session) -> Response {
    // Generate CSRF state and OpenID nonce
    let oauth_state = generate_random_string(32);
    let nonce = generate_random_string(32);

    // Store in session for validation on callback
    if let Err(e) = session
        .insert(session_keys::OAUTH_STATE, &oauth_state)
        .await
    {
        tracing::error!("Failed to store OAuth state in session: {}", e);
        return Redirect::to("/?error=session").into_response();
    }

    if let Err(e) = session.insert(session_keys::OAUTH_NONCE, &nonce).await {
        tracing::error!("Failed to store OAuth nonce in session: {}", e);
        return Redirect::to("/?error=session").into_response();
    }

    // Build the redirect URI
    let redirect_uri = format!("{}/auth/callback", state.config().base_url);

    // Generate and redirect to authorization URL
    let auth_url = state
        .oidc()
        .authorization_url(&redirect_uri, &oauth_state, &nonce);

    Redirect::to(&auth_url).into_response()
}

/// Handle the OAuth callback.
///
/// Validates the state parameter, exchanges the authorization code for
/// tokens, fetches the identity assertion from the userinfo endpoint, and
/// stores it in the session. The local user row is NOT created here; that
/// happens lazily on the first cart or order interaction.
///
/// # Route
///
/// `GET /auth/callback`
pub async fn callback(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<CallbackQuery>,
) -> Response {
    // Check for OAuth errors from the provider
    if let Some(error) = query.error {
        let description = query.error_description.unwrap_or_default();
        tracing::warn!("OAuth error from provider: {} - {}", error, description);
        return Redirect::to("/?error=denied").into_response();
    }

    // Verify we have an authorization code
    let Some(code) = query.code else {
        tracing::warn!("OAuth callback missing code");
        return Redirect::to("/?error=missing_code").into_response();
    };

    // Verify state parameter (CSRF protection)
    let Some(returned_state) = query.state else {
        tracing::warn!("OAuth callback missing state");
        return Redirect::to("/?error=missing_state").into_response();
    };

    let stored_state: Option<String> = session
        .get(session_keys::OAUTH_STATE)
        .await
        .ok()
        .flatten();

    if stored_state.as_ref() != Some(&returned_state) {
        tracing::warn!("OAuth state mismatch");
        return Redirect::to("/?error=invalid_state").into_response();
    }

    // Clear the stored state (one-time use)
    let _ = session.remove::<String>(session_keys::OAUTH_STATE).await;
    let _ = session.remove::<String>(session_keys::OAUTH_NONCE).await;

    // Build redirect URI (must match the one used in authorization request)
    let redirect_uri = format!("{}/auth/callback", state.config().base_url);

    // Exchange code for tokens
    let token = match state.oidc().exchange_code(&code, &redirect_uri).await {
        Ok(token) => token,
        Err(e) => {
            tracing::error!("Failed to exchange OAuth code: {}", e);
            return Redirect::to("/?error=token_exchange").into_response();
        }
    };

    // Fetch the identity assertion
    let claims = match state.oidc().userinfo(&token.access_token).await {
        Ok(claims) => claims,
        Err(e) => {
            tracing::error!("Failed to fetch userinfo: {}", e);
            return Redirect::to("/?error=userinfo").into_response();
        }
    };

    let Some(raw_email) = claims.email else {
        tracing::error!("Userinfo response missing email claim");
        return Redirect::to("/?error=missing_email").into_response();
    };

    let email = match Email::parse(&raw_email) {
        Ok(email) => email,
        Err(e) => {
            tracing::error!("Provider asserted invalid email: {}", e);
            return Redirect::to("/?error=invalid_email").into_response();
        }
    };

    // Store the identity in the session
    let user = CurrentUser {
        subject: claims.sub,
        email,
    };

    if let Err(e) = set_current_user(&session, &user).await {
        tracing::error!("Failed to store user in session: {}", e);
        return Redirect::to("/?error=session").into_response();
    }

    // Keep the ID token for RP-initiated logout
    if let Some(id_token) = token.id_token
        && let Err(e) = session.insert(session_keys::ID_TOKEN, &id_token).await
    {
        tracing::warn!("Failed to store ID token in session: {}", e);
    }

    tracing::info!("User authenticated successfully");

    Redirect::to("/").into_response()
}

/// Log out the current user.
///
/// Clears the session identity and redirects to the provider's logout
/// endpoint so the provider session ends too.
///
/// # Route
///
/// `POST /auth/logout`
pub async fn logout(State(state): State<AppState>, session: Session) -> Response {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session identity: {}", e);
    }
    let _ = session.remove::<String>(session_keys::ID_TOKEN).await;

    let return_to = format!("{}/", state.config().base_url);
    let logout_url = state.oidc().logout_url(&return_to);

    Redirect::to(&logout_url).into_response()
}
