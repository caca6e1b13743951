//! [`Resource`] implementation for [`Order`].
//!
//! Orders are read with their items attached. Creation runs the placement check in
//! [`workflow`](super::workflow); updates never touch `total_amount` or the items.

use super::error::OrderError;
use super::workflow::place_order;
use super::OrderContext;
use crate::model::{Order, OrderCreate, OrderItem, OrderReplace, OrderUpdate};
use async_trait::async_trait;
use chrono::Utc;
use service_framework::Resource;
use sqlx::SqlitePool;
use std::collections::HashMap;

const SELECT_ORDER: &str = "SELECT id, user_id, status, total_amount, shipping_address, \
     created_at, updated_at FROM orders";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

#[async_trait]
impl Resource for Order {
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Replace = OrderReplace;
    type Context = OrderContext;
    type Error = OrderError;

    const COLLECTION: &'static str = "orders";
    const NAME: &'static str = "Order";

    async fn list(ctx: &OrderContext) -> Result<Vec<Self>, OrderError> {
        let orders = sqlx::query_as(&format!("{SELECT_ORDER} {NEWEST_FIRST}"))
            .fetch_all(&ctx.pool)
            .await?;
        Ok(with_items(&ctx.pool, orders).await?)
    }

    async fn fetch(ctx: &OrderContext, id: i64) -> Result<Option<Self>, OrderError> {
        let order: Option<Order> = sqlx::query_as(&format!("{SELECT_ORDER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&ctx.pool)
            .await?;
        match order {
            Some(order) => Ok(with_items(&ctx.pool, vec![order]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn create(ctx: &OrderContext, params: OrderCreate) -> Result<Self, OrderError> {
        place_order(ctx, params).await
    }

    async fn update(
        ctx: &OrderContext,
        id: i64,
        update: OrderUpdate,
    ) -> Result<Option<Self>, OrderError> {
        let Some(mut order) = Self::fetch(ctx, id).await? else {
            return Ok(None);
        };
        order.apply(update);
        sqlx::query(
            "UPDATE orders SET user_id = ?, status = ?, shipping_address = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(order.user_id)
        .bind(order.status)
        .bind(order.shipping_address.trim())
        .bind(Utc::now())
        .bind(id)
        .execute(&ctx.pool)
        .await?;
        Self::fetch(ctx, id).await
    }

    /// Items go with the order.
    async fn delete(ctx: &OrderContext, id: i64) -> Result<bool, OrderError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&ctx.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Orders placed by `user_id`, newest first.
pub async fn orders_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Order>, OrderError> {
    let orders = sqlx::query_as(&format!("{SELECT_ORDER} WHERE user_id = ? {NEWEST_FIRST}"))
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(with_items(pool, orders).await?)
}

/// Loads the items of `orders` in one query and attaches them in id order.
async fn with_items(pool: &SqlitePool, mut orders: Vec<Order>) -> Result<Vec<Order>, sqlx::Error> {
    if orders.is_empty() {
        return Ok(orders);
    }
    let placeholders = vec!["?"; orders.len()].join(", ");
    let sql = format!(
        "SELECT id, order_id, book_id, quantity, price FROM order_items \
         WHERE order_id IN ({placeholders}) ORDER BY id"
    );
    let mut query = sqlx::query_as::<_, OrderItem>(&sql);
    for order in &orders {
        query = query.bind(order.id);
    }
    let mut by_order: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    for item in query.fetch_all(pool).await? {
        by_order.entry(item.order_id).or_default().push(item);
    }
    for order in &mut orders {
        order.items = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(orders)
}
