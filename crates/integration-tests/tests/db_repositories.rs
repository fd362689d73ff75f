//! Repository-level integration tests against a real `PostgreSQL` database.
//!
//! These exercise the storage semantics the API depends on: idempotent
//! identity resolution, cart upsert-with-increment, and order-placement
//! atomicity.
//!
//! They require `MERCH_DATABASE_URL` (or `DATABASE_URL`) to point at a
//! migrated database. Run with:
//! cargo test -p merch-integration-tests -- --ignored

use rust_decimal::Decimal;
use secrecy::SecretString;
use sqlx::PgPool;

use merch_core::{Email, ProductId, UserId};
use merch_server::db::{self, CartRepository, OrderRepository, UserRepository};
use merch_server::models::OrderItemInput;

use merch_integration_tests::unique_suffix;

async fn test_pool() -> PgPool {
    let url = std::env::var("MERCH_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .expect("MERCH_DATABASE_URL not set");
    db::create_pool(&url).await.expect("Failed to connect")
}

async fn seed_product(pool: &PgPool, name: &str) -> ProductId {
    let id: i32 = sqlx::query_scalar(
        "INSERT INTO products (name, original_price, image_url) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(name)
    .bind(Decimal::new(999, 2))
    .bind("/images/test.png")
    .fetch_one(pool)
    .await
    .expect("Failed to seed product");

    ProductId::new(id)
}

async fn cart_quantities(pool: &PgPool, user_id: UserId) -> Vec<(i32, i32)> {
    sqlx::query_as("SELECT product_id, quantity FROM cart_items WHERE user_id = $1")
        .bind(user_id.as_i32())
        .fetch_all(pool)
        .await
        .expect("Failed to read cart")
}

async fn order_count(pool: &PgPool, user_id: UserId) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = $1")
        .bind(user_id.as_i32())
        .fetch_one(pool)
        .await
        .expect("Failed to count orders")
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_identity_resolution_is_idempotent() {
    let pool = test_pool().await;
    let users = UserRepository::new(&pool);

    let subject = format!("oidc|{}", unique_suffix());
    let email = Email::parse("shopper@example.com").expect("valid email");

    let first = users.ensure(&subject, &email).await.expect("first ensure");
    let second = users.ensure(&subject, &email).await.expect("second ensure");

    assert_eq!(first, second);

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE subject = $1")
        .bind(&subject)
        .fetch_one(&pool)
        .await
        .expect("Failed to count users");
    assert_eq!(rows, 1);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_cart_add_increments_single_row() {
    let pool = test_pool().await;
    let suffix = unique_suffix();

    let email = Email::parse("shopper@example.com").expect("valid email");
    let user_id = UserRepository::new(&pool)
        .ensure(&format!("oidc|{suffix}"), &email)
        .await
        .expect("ensure user");
    let product_id = seed_product(&pool, &format!("Cap {suffix}")).await;

    let carts = CartRepository::new(&pool);
    carts.add_item(user_id, product_id, 2).await.expect("first add");
    carts.add_item(user_id, product_id, 3).await.expect("second add");

    let rows = cart_quantities(&pool, user_id).await;
    assert_eq!(rows, vec![(product_id.as_i32(), 5)]);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_remove_absent_cart_item_is_not_an_error() {
    let pool = test_pool().await;
    let suffix = unique_suffix();

    let email = Email::parse("shopper@example.com").expect("valid email");
    let user_id = UserRepository::new(&pool)
        .ensure(&format!("oidc|{suffix}"), &email)
        .await
        .expect("ensure user");
    let product_id = seed_product(&pool, &format!("Mug {suffix}")).await;

    let removed = CartRepository::new(&pool)
        .remove_item(user_id, product_id)
        .await
        .expect("remove should succeed");
    assert!(!removed);
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_order_placement_commits_and_clears_cart() {
    let pool = test_pool().await;
    let suffix = unique_suffix();

    let email = Email::parse("shopper@example.com").expect("valid email");
    let user_id = UserRepository::new(&pool)
        .ensure(&format!("oidc|{suffix}"), &email)
        .await
        .expect("ensure user");
    let product_id = seed_product(&pool, &format!("Tee {suffix}")).await;

    CartRepository::new(&pool)
        .add_item(user_id, product_id, 2)
        .await
        .expect("add to cart");

    let items = vec![OrderItemInput {
        product_id,
        quantity: 2,
        price: Decimal::new(999, 2),
    }];
    let order_id = OrderRepository::new(&pool)
        .place(user_id, &items, Decimal::new(1998, 2))
        .await
        .expect("place order");

    // Order row with the submitted total
    let total: Decimal = sqlx::query_scalar("SELECT total_price FROM orders WHERE id = $1")
        .bind(order_id.as_i32())
        .fetch_one(&pool)
        .await
        .expect("order row");
    assert_eq!(total, Decimal::new(1998, 2));

    // One line item with the captured unit price
    let line: (i32, i32, Decimal) = sqlx::query_as(
        "SELECT product_id, quantity, price FROM order_items WHERE order_id = $1",
    )
    .bind(order_id.as_i32())
    .fetch_one(&pool)
    .await
    .expect("order item row");
    assert_eq!(line, (product_id.as_i32(), 2, Decimal::new(999, 2)));

    // Cart fully cleared
    assert!(cart_quantities(&pool, user_id).await.is_empty());
}

#[tokio::test]
#[ignore = "Requires a migrated PostgreSQL database"]
async fn test_failed_order_rolls_back_everything() {
    let pool = test_pool().await;
    let suffix = unique_suffix();

    let email = Email::parse("shopper@example.com").expect("valid email");
    let user_id = UserRepository::new(&pool)
        .ensure(&format!("oidc|{suffix}"), &email)
        .await
        .expect("ensure user");
    let product_id = seed_product(&pool, &format!("Poster {suffix}")).await;

    CartRepository::new(&pool)
        .add_item(user_id, product_id, 1)
        .await
        .expect("add to cart");

    // Second item references a product that does not exist, so the
    // order_items insert violates its foreign key mid-transaction.
    let items = vec![
        OrderItemInput {
            product_id,
            quantity: 1,
            price: Decimal::new(999, 2),
        },
        OrderItemInput {
            product_id: ProductId::new(-1),
            quantity: 1,
            price: Decimal::new(100, 2),
        },
    ];

    let result = OrderRepository::new(&pool)
        .place(user_id, &items, Decimal::new(1099, 2))
        .await;
    assert!(result.is_err());

    // Nothing from the transaction is visible: no order, cart untouched
    assert_eq!(order_count(&pool, user_id).await, 0);
    assert_eq!(
        cart_quantities(&pool, user_id).await,
        vec![(product_id.as_i32(), 1)]
    );
}
