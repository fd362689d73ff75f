//! Order placement payload types.

use rust_decimal::Decimal;
use serde::Deserialize;

use merch_core::ProductId;

/// One line of an order request: the product, how many, and the unit price
/// captured at checkout time (later catalog price changes must not affect
/// placed orders).
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

/// Body of `POST /orders`.
#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderItemInput>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}
