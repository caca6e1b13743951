//! Order endpoints beyond CRUD.

use super::entity::orders_by_user;
use super::error::OrderError;
use super::OrderContext;
use crate::model::{Order, OrderStatus, OrderUpdate, StatusChange};
use axum::extract::State;
use axum::Json;
use service_framework::{not_found, reject, QueryParams, Resource, ResourceId, ServiceError, ValidJson};
use tracing::info;

/// `GET /api/orders/by_user/?user_id=`
pub async fn by_user(
    State(ctx): State<OrderContext>,
    params: QueryParams,
) -> Result<Json<Vec<Order>>, ServiceError> {
    let user_id: i64 = params.required("user_id")?;
    let orders = orders_by_user(&ctx.pool, user_id).await.map_err(reject)?;
    Ok(Json(orders))
}

/// `PATCH /api/orders/{id}/update_status/` with `{"status": "..."}`.
///
/// Any known status may replace any other.
pub async fn update_status(
    State(ctx): State<OrderContext>,
    ResourceId(id): ResourceId,
    ValidJson(change): ValidJson<StatusChange>,
) -> Result<Json<Order>, ServiceError> {
    if Order::fetch(&ctx, id).await.map_err(reject)?.is_none() {
        return Err(not_found::<Order>(id));
    }
    let status = change
        .status
        .as_deref()
        .and_then(|s| s.parse::<OrderStatus>().ok())
        .ok_or(OrderError::InvalidStatus)
        .map_err(reject)?;

    let update = OrderUpdate {
        status: Some(status),
        ..OrderUpdate::default()
    };
    let order = Order::update(&ctx, id, update)
        .await
        .map_err(reject)?
        .ok_or_else(|| not_found::<Order>(id))?;
    info!(order_id = id, %status, "Order status updated");
    Ok(Json(order))
}
