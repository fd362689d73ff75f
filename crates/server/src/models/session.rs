//! Session-related types.
//!
//! Types stored in the session for authentication state.

use serde::{Deserialize, Serialize};

use merch_core::Email;

/// Session-stored identity assertion from the `OpenID` Connect provider.
///
/// This is the external identity, not a local user row: the local surrogate
/// id is resolved lazily on the first cart or order interaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// Stable subject identifier asserted by the provider.
    pub subject: String,
    /// Email address asserted by the provider.
    pub email: Email,
}

/// Session keys for authentication data.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for OAuth state (CSRF protection).
    pub const OAUTH_STATE: &str = "oauth_state";

    /// Key for OAuth nonce (`OpenID` Connect replay protection).
    pub const OAUTH_NONCE: &str = "oauth_nonce";

    /// Key for the provider-issued ID token (needed for RP-initiated logout).
    pub const ID_TOKEN: &str = "id_token";
}
