//! Order placement handler.
//!
//! The request walks a fixed sequence: authenticate (extractor), resolve the
//! local user id, validate the payload, then run the transactional
//! cart-to-order conversion. A request that fails validation never opens a
//! transaction; a request that fails inside the transaction leaves no trace.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use merch_core::OrderId;

use crate::db::{OrderRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::PlaceOrderRequest;
use crate::state::AppState;

/// Success body for `POST /orders`.
#[derive(Debug, Serialize)]
pub struct OrderPlacedResponse {
    pub message: String,
    #[serde(rename = "orderId")]
    pub order_id: OrderId,
}

/// Reject malformed order payloads before any transaction is opened.
fn validate_payload(req: &PlaceOrderRequest) -> Result<()> {
    if req.items.is_empty() {
        return Err(AppError::Validation("Order has no items".to_string()));
    }
    if req.items.iter().any(|item| item.quantity <= 0) {
        return Err(AppError::Validation("Invalid item quantity".to_string()));
    }
    if req.items.iter().any(|item| item.price.is_sign_negative()) {
        return Err(AppError::Validation("Invalid item price".to_string()));
    }
    if req.total.is_sign_negative() {
        return Err(AppError::Validation("Invalid order total".to_string()));
    }
    Ok(())
}

/// Place an order from the checkout payload.
///
/// # Route
///
/// `POST /orders`
#[instrument(skip(state, user, req))]
pub async fn create(
    State(state): State<AppState>,
    user: RequireAuth,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<Json<OrderPlacedResponse>> {
    let RequireAuth(user) = user;

    let user_id = UserRepository::new(state.pool())
        .ensure(&user.subject, &user.email)
        .await
        .map_err(AppError::Server)?;

    validate_payload(&req)?;

    let order_id = OrderRepository::new(state.pool())
        .place(user_id, &req.items, req.total)
        .await
        .map_err(AppError::OrderFailed)?;

    tracing::info!(order_id = %order_id, "Order placed");

    Ok(Json(OrderPlacedResponse {
        message: "Order placed successfully!".to_string(),
        order_id,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use merch_core::ProductId;
    use rust_decimal::Decimal;

    use crate::models::OrderItemInput;

    fn request(items: Vec<OrderItemInput>, total: Decimal) -> PlaceOrderRequest {
        PlaceOrderRequest { items, total }
    }

    fn item(product_id: i32, quantity: i32, price: Decimal) -> OrderItemInput {
        OrderItemInput {
            product_id: ProductId::new(product_id),
            quantity,
            price,
        }
    }

    #[test]
    fn test_validate_rejects_empty_items() {
        let result = validate_payload(&request(vec![], Decimal::ZERO));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_quantity() {
        for quantity in [0, -1] {
            let result = validate_payload(&request(
                vec![item(7, quantity, Decimal::new(999, 2))],
                Decimal::new(999, 2),
            ));
            assert!(matches!(result, Err(AppError::Validation(_))));
        }
    }

    #[test]
    fn test_validate_rejects_negative_money() {
        let result = validate_payload(&request(
            vec![item(7, 1, Decimal::new(-999, 2))],
            Decimal::new(999, 2),
        ));
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = validate_payload(&request(
            vec![item(7, 1, Decimal::new(999, 2))],
            Decimal::new(-999, 2),
        ));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_validate_accepts_well_formed_payload() {
        let result = validate_payload(&request(
            vec![item(7, 2, Decimal::new(999, 2))],
            Decimal::new(1998, 2),
        ));
        assert!(result.is_ok());
    }
}
