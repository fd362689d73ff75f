//! Cart repository: per-user cart lines.
//!
//! At most one row exists per (user, product); repeated adds increment the
//! quantity in place. Concurrent increments rely on the store's row-level
//! locking, not on any in-process coordination.

use sqlx::PgPool;

use merch_core::{ProductId, UserId};

use super::RepositoryError;
use crate::models::CartLine;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get all cart lines for a user, joined with product display fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn items_for(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let lines: Vec<CartLine> = sqlx::query_as(
            r"
            SELECT p.id, p.name, p.image_url, p.original_price, c.quantity
            FROM cart_items c
            JOIN products p ON c.product_id = p.id
            WHERE c.user_id = $1
            ",
        )
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;

        Ok(lines)
    }

    /// Add `quantity` of a product to a user's cart.
    ///
    /// Upsert-with-increment: if a row for (user, product) exists its
    /// quantity grows by `quantity`, otherwise a new row is created.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails (including
    /// a foreign-key violation for an unknown product).
    pub async fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id)
            DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// Remove a product from a user's cart.
    ///
    /// Deleting an absent row is not an error; the operation reports whether
    /// a row was actually removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn remove_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE user_id = $1 AND product_id = $2
            ",
        )
        .bind(user_id.as_i32())
        .bind(product_id.as_i32())
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
