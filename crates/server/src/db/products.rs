//! Catalog repository: products and their reviews.
//!
//! Products are read-only from this service; reviews are insert-only.

use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};

use merch_core::{ProductId, Rating};

use super::RepositoryError;
use crate::models::product::{ProductDetail, ProductSummary, Review};

/// Raw product row; `colors`/`sizes` stay comma-delimited until decoded.
#[derive(FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    original_price: Decimal,
    image_url: String,
    colors: Option<String>,
    sizes: Option<String>,
}

#[derive(FromRow)]
struct ReviewRow {
    user_name: String,
    rating: i16,
    comment: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

/// Decode a comma-delimited option column into a list.
///
/// NULL and empty text both mean "no options"; whitespace-only segments are
/// dropped rather than surfaced as phantom options.
fn decode_options(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products with summary fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<ProductSummary>, RepositoryError> {
        let rows: Vec<(i32, String, Decimal, String)> = sqlx::query_as(
            r"
            SELECT id, name, original_price, image_url
            FROM products
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, name, original_price, image_url)| ProductSummary {
                id: ProductId::new(id),
                name,
                original_price,
                image_url,
            })
            .collect())
    }

    /// Get one product with decoded option lists and its reviews.
    ///
    /// Reviews come back in natural storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored rating is out of
    /// range.
    pub async fn get(&self, id: ProductId) -> Result<Option<ProductDetail>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(
            r"
            SELECT id, name, description, original_price, image_url, colors, sizes
            FROM products
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let reviews = self.reviews(id).await?;

        Ok(Some(ProductDetail {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            original_price: row.original_price,
            image_url: row.image_url,
            colors: decode_options(row.colors.as_deref()),
            sizes: decode_options(row.sizes.as_deref()),
            reviews,
        }))
    }

    /// Get all reviews for a product, in natural storage order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored rating is out of
    /// range.
    pub async fn reviews(&self, product_id: ProductId) -> Result<Vec<Review>, RepositoryError> {
        let rows: Vec<ReviewRow> = sqlx::query_as(
            r"
            SELECT user_name, rating, comment, created_at
            FROM product_reviews
            WHERE product_id = $1
            ",
        )
        .bind(product_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        let mut reviews = Vec::with_capacity(rows.len());
        for r in rows {
            let rating = Rating::new(r.rating).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid rating in database: {e}"))
            })?;

            reviews.push(Review {
                user_name: r.user_name,
                rating,
                comment: r.comment,
                date: r.created_at,
            });
        }

        Ok(reviews)
    }

    /// Insert a new review for a product.
    ///
    /// Product existence is not checked here; a dangling product id is a
    /// foreign-key violation surfaced as a database error.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn insert_review(
        &self,
        product_id: ProductId,
        user_name: &str,
        rating: Rating,
        comment: &str,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO product_reviews (product_id, user_name, rating, comment)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(product_id.as_i32())
        .bind(user_name)
        .bind(rating.as_i16())
        .bind(comment)
        .execute(self.pool)
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_options_splits_on_comma() {
        assert_eq!(decode_options(Some("S,M,L")), vec!["S", "M", "L"]);
        assert_eq!(decode_options(Some("Black, Navy")), vec!["Black", "Navy"]);
    }

    #[test]
    fn test_decode_options_empty_inputs() {
        assert!(decode_options(None).is_empty());
        assert!(decode_options(Some("")).is_empty());
        assert!(decode_options(Some(" , ,")).is_empty());
    }
}
