//! Cart line types.

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;

use merch_core::ProductId;

/// A cart line as returned by `GET /api/cart`.
///
/// Product fields are joined in so the client can render the cart without a
/// second lookup; `id` is the product id, which doubles as the item id for
/// `DELETE /api/cart/{item_id}`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
    pub id: ProductId,
    pub name: String,
    pub image_url: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    pub quantity: i32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_json_shape() {
        let line = CartLine {
            id: ProductId::new(3),
            name: "Sticker pack".to_string(),
            image_url: "/images/stickers.png".to_string(),
            original_price: Decimal::new(499, 2),
            quantity: 2,
        };

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["original_price"], 4.99);
        assert_eq!(json["quantity"], 2);
    }
}
