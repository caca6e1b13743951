//! # Orders Service
//!
//! Owns orders and their line items. Placing an order is the one write in the
//! system that depends on two peers: the users service must know the buyer and
//! the books service must know every book and have it in stock. See [`workflow`]
//! for the exact sequence and failure semantics.
//!
//! ## Failure mapping
//!
//! | Cause | Status |
//! |-------|--------|
//! | user or book lookup answered non-200 | 404 |
//! | users or books service unreachable, timed out, unreadable | 503 |
//! | stock below the requested quantity | 400 |
//! | same book on two lines | 400 |
//!
//! ## Structure
//!
//! - [`entity`] - [`Resource`](service_framework::Resource) implementation for [`Order`](crate::model::Order)
//! - [`workflow`] - order placement
//! - [`actions`] - `by_user`, `update_status`
//! - [`error`] - [`OrderError`]

pub mod actions;
pub mod entity;
pub mod error;
pub mod workflow;

pub use error::*;

use crate::clients::{BookClient, UserClient};
use crate::model::Order;
use axum::routing::{get, patch};
use axum::Router;
use service_framework::resource_routes;
use sqlx::SqlitePool;

pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        status TEXT NOT NULL DEFAULT 'PENDING' CHECK (status IN
            ('PENDING', 'CONFIRMED', 'PROCESSING', 'SHIPPED', 'DELIVERED', 'CANCELLED')),
        total_amount TEXT NOT NULL DEFAULT '0.00',
        shipping_address TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS order_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
        book_id INTEGER NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 1),
        price TEXT NOT NULL,
        UNIQUE (order_id, book_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_orders_user ON orders(user_id)",
];

/// State shared by every orders handler.
#[derive(Debug, Clone)]
pub struct OrderContext {
    pub pool: SqlitePool,
    pub users: UserClient,
    pub books: BookClient,
}

/// Builds the orders service router.
pub fn router(ctx: OrderContext) -> Router {
    resource_routes::<Order>()
        .route("/api/orders/by_user/", get(actions::by_user))
        .route("/api/orders/:id/update_status/", patch(actions::update_status))
        .with_state(ctx)
}
