//! Cart route handlers.
//!
//! All three endpoints require an authenticated session and resolve the
//! local user id (creating the row on first contact) before touching the
//! cart.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use merch_core::ProductId;

use crate::db::{CartRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::CartLine;
use crate::routes::MessageResponse;
use crate::state::AppState;

/// Get the caller's cart.
///
/// # Route
///
/// `GET /api/cart`
#[instrument(skip(state, user))]
pub async fn index(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<Json<Vec<CartLine>>> {
    let RequireAuth(user) = user;

    let user_id = UserRepository::new(state.pool())
        .ensure(&user.subject, &user.email)
        .await
        .map_err(AppError::Server)?;

    let lines = CartRepository::new(state.pool())
        .items_for(user_id)
        .await
        .map_err(AppError::Server)?;

    Ok(Json(lines))
}

/// Add-to-cart body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: i32,
    pub quantity: i32,
}

/// Add a product to the caller's cart (upsert-with-increment).
///
/// # Route
///
/// `POST /api/cart`
#[instrument(skip(state, user, req))]
pub async fn add(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(req): Json<AddToCartRequest>,
) -> Result<Json<MessageResponse>> {
    let RequireAuth(user) = user;

    if req.quantity <= 0 {
        return Err(AppError::Validation("Invalid quantity".to_string()));
    }

    let user_id = UserRepository::new(state.pool())
        .ensure(&user.subject, &user.email)
        .await
        .map_err(AppError::Server)?;

    CartRepository::new(state.pool())
        .add_item(user_id, ProductId::new(req.product_id), req.quantity)
        .await
        .map_err(AppError::Server)?;

    Ok(Json(MessageResponse::new("Item added to cart")))
}

/// Remove a product from the caller's cart.
///
/// The item id in the path is the product id. Removing an absent item is a
/// success, not an error.
///
/// # Route
///
/// `DELETE /api/cart/{item_id}`
#[instrument(skip(state, user))]
pub async fn remove(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(item_id): Path<i32>,
) -> Result<Json<MessageResponse>> {
    let RequireAuth(user) = user;

    let user_id = UserRepository::new(state.pool())
        .ensure(&user.subject, &user.email)
        .await
        .map_err(AppError::Server)?;

    CartRepository::new(state.pool())
        .remove_item(user_id, ProductId::new(item_id))
        .await
        .map_err(AppError::Server)?;

    Ok(Json(MessageResponse::new("Item removed from cart")))
}
