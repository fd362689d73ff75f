//! Catalog route handlers: product listing, detail, and review submission.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::instrument;

use merch_core::{ProductId, Rating};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::{ProductDetail, ProductSummary};
use crate::routes::MessageResponse;
use crate::state::AppState;

/// List all products.
///
/// # Route
///
/// `GET /products`
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductSummary>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Get a single product with options and reviews.
///
/// # Route
///
/// `GET /products/{id}`
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ProductDetail>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Review submission body.
#[derive(Debug, Deserialize)]
pub struct NewReviewRequest {
    pub user_name: String,
    pub rating: i16,
    pub comment: String,
}

/// Submit a review for a product.
///
/// The rating is validated before any storage access; product existence is
/// left to the foreign-key constraint.
///
/// # Route
///
/// `POST /products/{id}/reviews`
#[instrument(skip(state, req))]
pub async fn add_review(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<NewReviewRequest>,
) -> Result<Json<MessageResponse>> {
    let rating = Rating::new(req.rating)
        .map_err(|_| AppError::Validation("Invalid rating".to_string()))?;

    ProductRepository::new(state.pool())
        .insert_review(ProductId::new(id), &req.user_name, rating, &req.comment)
        .await?;

    Ok(Json(MessageResponse::new("Review added successfully")))
}
