//! External-service clients.
//!
//! # Services
//!
//! - `oidc` - `OpenID` Connect client (authorization redirect, code
//!   exchange, userinfo lookup, RP-initiated logout)

pub mod oidc;

pub use oidc::{IdentityClaims, OidcClient, OidcError, TokenSet};
