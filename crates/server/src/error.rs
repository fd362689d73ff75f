//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-side errors to
//! Sentry before responding to the client. All route handlers should return
//! `Result<T, AppError>`.
//!
//! Client-facing bodies for storage failures are deliberately generic; the
//! failing query context is logged server-side only.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the merch API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog storage operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Cart or identity storage operation failed.
    #[error("Server error: {0}")]
    Server(RepositoryError),

    /// Order placement failed inside the transaction.
    #[error("Order failed: {0}")]
    OrderFailed(RepositoryError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller has no authenticated session.
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request payload (invalid rating, malformed order).
    #[error("Validation error: {0}")]
    Validation(String),
}

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Database(_) | Self::Server(_) | Self::OrderFailed(_) | Self::Session(_)
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Server(_) | Self::OrderFailed(_) | Self::Session(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(RepositoryError::DataCorruption(_)) => {
                "Data processing error".to_string()
            }
            Self::Database(_) => "Database error".to_string(),
            Self::Server(_) | Self::Session(_) => "Server error".to_string(),
            Self::OrderFailed(_) => "Order failed".to_string(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::NotFound(msg) | Self::Validation(msg) => msg.clone(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
