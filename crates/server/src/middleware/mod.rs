//! Request middleware and extractors.

pub mod auth;
pub mod session;

pub use auth::{AuthRejection, RequireAuth, clear_current_user, set_current_user};
pub use session::create_session_layer;
