//! Order repository: the transactional order-placement flow.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use merch_core::{OrderId, UserId};

use super::RepositoryError;
use crate::models::OrderItemInput;

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Place an order: insert the order row, its items, and clear the user's
    /// cart, all inside one transaction.
    ///
    /// The sequence is fixed: insert `orders` and take the generated id,
    /// multi-row insert into `order_items` (unit prices captured from the
    /// payload, not looked up live), then an unconditional delete of every
    /// `cart_items` row for the user. If any statement fails the transaction
    /// is rolled back on drop and nothing becomes visible.
    ///
    /// The caller validates the payload; `items` must be non-empty.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement or the commit
    /// fails.
    pub async fn place(
        &self,
        user_id: UserId,
        items: &[OrderItemInput],
        total: Decimal,
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO orders (user_id, total_price)
            VALUES ($1, $2)
            RETURNING id
            ",
        )
        .bind(user_id.as_i32())
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let mut insert_items: QueryBuilder<'_, Postgres> =
            QueryBuilder::new("INSERT INTO order_items (order_id, product_id, quantity, price) ");
        insert_items.push_values(items, |mut row, item| {
            row.push_bind(order_id)
                .push_bind(item.product_id.as_i32())
                .push_bind(item.quantity)
                .push_bind(item.price);
        });
        insert_items.build().execute(&mut *tx).await?;

        sqlx::query(
            r"
            DELETE FROM cart_items WHERE user_id = $1
            ",
        )
        .bind(user_id.as_i32())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(OrderId::new(order_id))
    }
}
