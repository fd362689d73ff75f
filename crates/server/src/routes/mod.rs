//! HTTP route handlers for the merch API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Liveness check
//! GET  /health/ready             - Readiness check (database ping)
//!
//! # Catalog (public)
//! GET  /products                 - Product listing
//! GET  /products/{id}            - Product detail with reviews
//! POST /products/{id}/reviews    - Submit a review
//!
//! # Cart (requires session)
//! GET    /api/cart               - Cart contents
//! POST   /api/cart               - Add item (upsert-with-increment)
//! DELETE /api/cart/{item_id}     - Remove item (item id = product id)
//!
//! # Orders (requires session)
//! POST /orders                   - Place an order from the checkout payload
//!
//! # Auth (OpenID Connect, delegated)
//! GET  /auth/login               - Redirect to provider login
//! GET  /auth/callback            - Handle provider callback
//! POST /auth/logout              - Clear session, redirect to provider logout
//! ```

pub mod auth;
pub mod cart;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use serde::Serialize;

use crate::state::AppState;

/// Confirmation body: `{"message": "..."}`.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    /// Create a confirmation message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Create the catalog routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", post(products::add_review))
}

/// Create the cart API routes router.
pub fn cart_routes() -> Router<AppState> {
    use axum::routing::delete;

    Router::new()
        .route("/", get(cart::index).post(cart::add))
        .route("/{item_id}", delete(cart::remove))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login))
        .route("/callback", get(auth::callback))
        .route("/logout", post(auth::logout))
}

/// Create all routes for the merch API.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Catalog routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/api/cart", cart_routes())
        // Order placement
        .route("/orders", post(orders::create))
        // Auth routes
        .nest("/auth", auth_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::util::ServiceExt;

    use crate::config::{MerchConfig, OidcConfig};
    use crate::state::AppState;

    /// Build an `AppState` over a lazy pool: no connection is made unless a
    /// handler actually touches the database.
    fn test_state() -> AppState {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/merch_test")
            .unwrap();

        let config = MerchConfig {
            database_url: SecretString::from("postgres://localhost/merch_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 5000,
            base_url: "http://localhost:5000".to_string(),
            session_secret: SecretString::from("x".repeat(32)),
            oidc: OidcConfig {
                issuer_url: "https://tenant.example.auth0.com".to_string(),
                client_id: "client".to_string(),
                client_secret: SecretString::from("secret"),
            },
            sentry_dsn: None,
        };

        AppState::new(config, pool)
    }

    async fn send(method: Method, uri: &str, body: Option<&str>) -> StatusCode {
        let app = super::routes().with_state(test_state());

        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_owned()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        app.oneshot(request).await.unwrap().status()
    }

    // Without a session layer there is no session in the request extensions,
    // which is indistinguishable from an unauthenticated caller: every
    // protected route must reject before touching the (lazy, unconnected)
    // pool.

    #[tokio::test]
    async fn test_get_cart_requires_auth() {
        assert_eq!(
            send(Method::GET, "/api/cart", None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_add_to_cart_requires_auth() {
        let status = send(
            Method::POST,
            "/api/cart",
            Some(r#"{"product_id":1,"quantity":1}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_remove_from_cart_requires_auth() {
        assert_eq!(
            send(Method::DELETE, "/api/cart/1", None).await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_place_order_requires_auth() {
        let status = send(
            Method::POST,
            "/orders",
            Some(r#"{"items":[{"product_id":7,"quantity":2,"price":9.99}],"total":19.98}"#),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
}
