//! # Payment Settlement
//!
//! A payment is accepted only for an order the orders service knows, and only for
//! exactly that order's `total_amount`. Settlement is simulated: the row is written
//! PENDING and walked through PROCESSING to COMPLETED in one transaction.
//!
//! Refunds are the only other transition: COMPLETED → REFUNDED, applied with a
//! conditional update so a payment can't be refunded twice.

use super::error::PaymentError;
use super::PaymentContext;
use crate::model::{Payment, PaymentCreate, PaymentStatus};
use chrono::Utc;
use service_framework::{PeerClient, Resource};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

#[instrument(skip(ctx, params), fields(order_id = params.order_id, amount = ?params.amount))]
pub async fn settle_payment(
    ctx: &PaymentContext,
    params: PaymentCreate,
) -> Result<Payment, PaymentError> {
    let order = ctx
        .orders
        .get(params.order_id)
        .await?
        .ok_or(PaymentError::OrderNotFound(params.order_id))?;

    let amount = params.amount.ok_or(PaymentError::MissingAmount)?;
    if amount.to_f64() != order.total_amount.to_f64() {
        warn!(total_amount = %order.total_amount, "Payment amount mismatch");
        return Err(PaymentError::AmountMismatch {
            amount,
            total_amount: order.total_amount,
        });
    }
    debug!("Order total verified");

    let now = Utc::now();
    let transaction_id = Uuid::new_v4().to_string();
    let mut tx = ctx.pool.begin().await?;
    let (payment_id,): (i64,) = sqlx::query_as(
        "INSERT INTO payments (order_id, user_id, amount, payment_method, status, \
         transaction_id, payment_date, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(params.order_id)
    .bind(params.user_id)
    .bind(amount)
    .bind(params.payment_method)
    .bind(PaymentStatus::Pending)
    .bind(&transaction_id)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;
    debug!(payment_id, %transaction_id, "Payment recorded");

    for status in [PaymentStatus::Processing, PaymentStatus::Completed] {
        set_status(&mut *tx, payment_id, status).await?;
        debug!(payment_id, ?status, "Payment advanced");
    }
    tx.commit().await?;
    info!(payment_id, %transaction_id, "Payment completed");

    Payment::fetch(ctx, payment_id)
        .await?
        .ok_or(PaymentError::Database(sqlx::Error::RowNotFound))
}

/// COMPLETED → REFUNDED. Any other current status is left unchanged.
#[instrument(skip(pool))]
pub async fn refund_payment(pool: &SqlitePool, id: i64) -> Result<(), PaymentError> {
    let result = sqlx::query(
        "UPDATE payments SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(PaymentStatus::Refunded)
    .bind(Utc::now())
    .bind(id)
    .bind(PaymentStatus::Completed)
    .execute(pool)
    .await?;
    if result.rows_affected() == 1 {
        info!("Payment refunded");
        return Ok(());
    }

    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM payments WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match exists {
        Some(_) => Err(PaymentError::NotRefundable),
        None => Err(PaymentError::NotFound(id)),
    }
}

async fn set_status(
    conn: &mut SqliteConnection,
    id: i64,
    status: PaymentStatus,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE payments SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(Utc::now())
        .bind(id)
        .execute(conn)
        .await?;
    Ok(())
}
