//! Payment endpoints beyond CRUD.

use super::entity::{payments_where, PaymentFilter};
use super::workflow::refund_payment;
use super::PaymentContext;
use crate::model::Payment;
use axum::extract::State;
use axum::Json;
use service_framework::{not_found, reject, QueryParams, Resource, ResourceId, ServiceError};

/// `GET /api/payments/by_order/?order_id=`
pub async fn by_order(
    State(ctx): State<PaymentContext>,
    params: QueryParams,
) -> Result<Json<Vec<Payment>>, ServiceError> {
    let order_id: i64 = params.required("order_id")?;
    let payments = payments_where(&ctx.pool, PaymentFilter::Order, order_id)
        .await
        .map_err(reject)?;
    Ok(Json(payments))
}

/// `GET /api/payments/by_user/?user_id=`
pub async fn by_user(
    State(ctx): State<PaymentContext>,
    params: QueryParams,
) -> Result<Json<Vec<Payment>>, ServiceError> {
    let user_id: i64 = params.required("user_id")?;
    let payments = payments_where(&ctx.pool, PaymentFilter::User, user_id)
        .await
        .map_err(reject)?;
    Ok(Json(payments))
}

/// `POST /api/payments/{id}/refund/`
pub async fn refund(
    State(ctx): State<PaymentContext>,
    ResourceId(id): ResourceId,
) -> Result<Json<Payment>, ServiceError> {
    refund_payment(&ctx.pool, id).await.map_err(reject)?;
    let payment = Payment::fetch(&ctx, id)
        .await
        .map_err(reject)?
        .ok_or_else(|| not_found::<Payment>(id))?;
    Ok(Json(payment))
}
