//! [`Resource`] implementation for [`Payment`].

use super::error::PaymentError;
use super::workflow::settle_payment;
use super::PaymentContext;
use crate::model::{Payment, PaymentCreate, PaymentReplace, PaymentUpdate};
use async_trait::async_trait;
use chrono::Utc;
use service_framework::Resource;
use sqlx::SqlitePool;

const SELECT_PAYMENT: &str = "SELECT id, order_id, user_id, amount, payment_method, status, \
     transaction_id, payment_date, updated_at FROM payments";

const NEWEST_FIRST: &str = "ORDER BY payment_date DESC, id DESC";

#[async_trait]
impl Resource for Payment {
    type Create = PaymentCreate;
    type Update = PaymentUpdate;
    type Replace = PaymentReplace;
    type Context = PaymentContext;
    type Error = PaymentError;

    const COLLECTION: &'static str = "payments";
    const NAME: &'static str = "Payment";

    async fn list(ctx: &PaymentContext) -> Result<Vec<Self>, PaymentError> {
        let payments = sqlx::query_as(&format!("{SELECT_PAYMENT} {NEWEST_FIRST}"))
            .fetch_all(&ctx.pool)
            .await?;
        Ok(payments)
    }

    async fn fetch(ctx: &PaymentContext, id: i64) -> Result<Option<Self>, PaymentError> {
        let payment = sqlx::query_as(&format!("{SELECT_PAYMENT} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&ctx.pool)
            .await?;
        Ok(payment)
    }

    async fn create(ctx: &PaymentContext, params: PaymentCreate) -> Result<Self, PaymentError> {
        settle_payment(ctx, params).await
    }

    async fn update(
        ctx: &PaymentContext,
        id: i64,
        update: PaymentUpdate,
    ) -> Result<Option<Self>, PaymentError> {
        let Some(mut payment) = Self::fetch(ctx, id).await? else {
            return Ok(None);
        };
        payment.apply(update);
        sqlx::query(
            "UPDATE payments SET order_id = ?, user_id = ?, amount = ?, payment_method = ?, \
             status = ?, updated_at = ? WHERE id = ?",
        )
        .bind(payment.order_id)
        .bind(payment.user_id)
        .bind(payment.amount)
        .bind(payment.payment_method)
        .bind(payment.status)
        .bind(Utc::now())
        .bind(id)
        .execute(&ctx.pool)
        .await?;
        Self::fetch(ctx, id).await
    }

    async fn delete(ctx: &PaymentContext, id: i64) -> Result<bool, PaymentError> {
        let result = sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(&ctx.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Payments whose `column` equals `value`, newest first.
pub(crate) async fn payments_where(
    pool: &SqlitePool,
    column: PaymentFilter,
    value: i64,
) -> Result<Vec<Payment>, PaymentError> {
    let sql = format!("{SELECT_PAYMENT} WHERE {} = ? {NEWEST_FIRST}", column.as_str());
    let payments = sqlx::query_as(&sql).bind(value).fetch_all(pool).await?;
    Ok(payments)
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum PaymentFilter {
    Order,
    User,
}

impl PaymentFilter {
    fn as_str(self) -> &'static str {
        match self {
            PaymentFilter::Order => "order_id",
            PaymentFilter::User => "user_id",
        }
    }
}
