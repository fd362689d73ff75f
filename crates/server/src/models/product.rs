//! Product and review types.
//!
//! These are the JSON shapes served by the catalog endpoints. Prices are
//! `Decimal` in memory and serialize as JSON numbers; review timestamps
//! serialize as ISO-8601 strings.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use merch_core::{ProductId, Rating};

/// Product summary as returned by `GET /products`.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub id: ProductId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    pub image_url: String,
}

/// Full product detail as returned by `GET /products/{id}`.
///
/// `colors` and `sizes` are stored as comma-delimited text and decoded to
/// arrays; a product without options gets empty arrays.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub original_price: Decimal,
    pub image_url: String,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub reviews: Vec<Review>,
}

/// A customer review attached to a product detail response.
#[derive(Debug, Clone, Serialize)]
pub struct Review {
    pub user_name: String,
    pub rating: Rating,
    pub comment: String,
    /// Creation time, serialized as an ISO-8601 string.
    pub date: DateTime<Utc>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    #[test]
    fn test_summary_serializes_price_as_number() {
        let summary = ProductSummary {
            id: ProductId::new(1),
            name: "Hoodie".to_string(),
            original_price: Decimal::new(1999, 2),
            image_url: "/images/hoodie.png".to_string(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["original_price"], 19.99);
    }

    #[test]
    fn test_review_date_is_iso8601() {
        let review = Review {
            user_name: "sam".to_string(),
            rating: Rating::new(5).unwrap(),
            comment: "great".to_string(),
            date: Utc.with_ymd_and_hms(2026, 1, 15, 10, 30, 0).unwrap(),
        };

        let json = serde_json::to_value(&review).unwrap();
        assert_eq!(json["rating"], 5);
        let date = json["date"].as_str().unwrap();
        assert!(date.starts_with("2026-01-15T10:30:00"));
    }
}
