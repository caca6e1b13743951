//! # Payments Service
//!
//! Owns payment records. Creating a payment is a hard dependency on the orders
//! service: if the order can't be fetched the payment is refused (404 when the order
//! is unknown, 503 when the orders service is unreachable). See [`workflow`].
//!
//! ## Structure
//!
//! - [`entity`] - [`Resource`](service_framework::Resource) implementation for [`Payment`](crate::model::Payment)
//! - [`workflow`] - settlement and refunds
//! - [`actions`] - `by_order`, `by_user`, `refund`
//! - [`error`] - [`PaymentError`]

pub mod actions;
pub mod entity;
pub mod error;
pub mod workflow;

pub use error::*;

use crate::clients::OrderClient;
use crate::model::Payment;
use axum::routing::{get, post};
use axum::Router;
use service_framework::resource_routes;
use sqlx::SqlitePool;

pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS payments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        payment_method TEXT NOT NULL CHECK (payment_method IN
            ('CREDIT_CARD', 'DEBIT_CARD', 'PAYPAL', 'BANK_TRANSFER')),
        status TEXT NOT NULL DEFAULT 'PENDING' CHECK (status IN
            ('PENDING', 'PROCESSING', 'COMPLETED', 'FAILED', 'REFUNDED')),
        transaction_id TEXT NOT NULL UNIQUE,
        payment_date TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_payments_order ON payments(order_id)",
    "CREATE INDEX IF NOT EXISTS idx_payments_user ON payments(user_id)",
];

/// State shared by every payments handler.
#[derive(Debug, Clone)]
pub struct PaymentContext {
    pub pool: SqlitePool,
    pub orders: OrderClient,
}

/// Builds the payments service router.
pub fn router(ctx: PaymentContext) -> Router {
    resource_routes::<Payment>()
        .route("/api/payments/by_order/", get(actions::by_order))
        .route("/api/payments/by_user/", get(actions::by_user))
        .route("/api/payments/:id/refund/", post(actions::refund))
        .with_state(ctx)
}
