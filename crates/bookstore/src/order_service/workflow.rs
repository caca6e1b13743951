//! # Order Placement
//!
//! The cross-service check that runs before an order is written:
//!
//! 1. Reject duplicate books across lines (no peer is called).
//! 2. The user must exist in the users service.
//! 3. Each book, in input order, must exist in the books service with enough stock.
//!    The first failing line stops the check.
//! 4. Each line's price is the book's price right now; the total is the sum of
//!    `price × quantity`, rounded to cents.
//! 5. The order and its lines are inserted in one transaction.
//!
//! Nothing is written until every check has passed, and no peer is called once the
//! transaction has started. Stock is only read, never reserved or decremented.

use super::error::OrderError;
use super::OrderContext;
use crate::model::{Order, OrderCreate, OrderItemCreate, OrderStatus};
use chrono::Utc;
use service_framework::{Money, PeerClient, Resource};
use sqlx::SqlitePool;
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// A validated line with its price snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedItem {
    pub book_id: i64,
    pub quantity: i64,
    pub price: Money,
}

#[instrument(skip(ctx, params), fields(user_id = params.user_id, items = params.items.len()))]
pub async fn place_order(ctx: &OrderContext, params: OrderCreate) -> Result<Order, OrderError> {
    reject_duplicate_books(&params.items)?;

    if ctx.users.get(params.user_id).await?.is_none() {
        return Err(OrderError::UserNotFound(params.user_id));
    }
    debug!("User verified");

    let mut priced = Vec::with_capacity(params.items.len());
    for item in &params.items {
        let book = ctx
            .books
            .get(item.book_id)
            .await?
            .ok_or(OrderError::BookNotFound(item.book_id))?;
        if book.stock < item.quantity {
            return Err(OrderError::InsufficientStock(item.book_id));
        }
        debug!(book_id = item.book_id, price = %book.price, stock = book.stock, "Book verified");
        priced.push(PricedItem {
            book_id: item.book_id,
            quantity: item.quantity,
            price: book.price.to_cents(),
        });
    }

    let total_amount = order_total(&priced);
    let order_id = insert_order(
        &ctx.pool,
        params.user_id,
        &params.shipping_address,
        total_amount,
        &priced,
    )
    .await?;
    info!(order_id, total_amount = %total_amount, "Order created");

    Order::fetch(ctx, order_id)
        .await?
        .ok_or(OrderError::Database(sqlx::Error::RowNotFound))
}

/// Σ(price × quantity), rounded to cents.
pub fn order_total(items: &[PricedItem]) -> Money {
    items
        .iter()
        .map(|item| item.price * item.quantity)
        .sum::<Money>()
        .to_cents()
}

fn reject_duplicate_books(items: &[OrderItemCreate]) -> Result<(), OrderError> {
    let mut seen = HashSet::with_capacity(items.len());
    for item in items {
        if !seen.insert(item.book_id) {
            return Err(OrderError::DuplicateItem(item.book_id));
        }
    }
    Ok(())
}

async fn insert_order(
    pool: &SqlitePool,
    user_id: i64,
    shipping_address: &str,
    total_amount: Money,
    items: &[PricedItem],
) -> Result<i64, sqlx::Error> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let (order_id,): (i64,) = sqlx::query_as(
        "INSERT INTO orders (user_id, status, total_amount, shipping_address, created_at, \
         updated_at) VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(user_id)
    .bind(OrderStatus::Pending)
    .bind(total_amount)
    .bind(shipping_address.trim())
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for item in items {
        sqlx::query("INSERT INTO order_items (order_id, book_id, quantity, price) VALUES (?, ?, ?, ?)")
            .bind(order_id)
            .bind(item.book_id)
            .bind(item.quantity)
            .bind(item.price)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(order_id)
}
