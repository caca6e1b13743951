//! # Generic CRUD Routes
//!
//! [`resource_routes`] mounts the standard collection and member routes for any
//! [`Resource`]:
//!
//! | Method | Path | Result |
//! |--------|------|--------|
//! | `GET` | `/api/{collection}/` | 200, list |
//! | `POST` | `/api/{collection}/` | 201, created item |
//! | `GET` | `/api/{collection}/{id}/` | 200 or 404 |
//! | `PUT` | `/api/{collection}/{id}/` | 200 or 404 |
//! | `PATCH` | `/api/{collection}/{id}/` | 200 or 404 |
//! | `DELETE` | `/api/{collection}/{id}/` | 204 or 404 |
//!
//! Derived routes (`by_user`, `refund`, ...) are added by each service on top of
//! the returned router.

use crate::error::{reject, ServiceError};
use crate::extract::{ResourceId, ValidJson};
use crate::resource::{not_found, Resource};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use tracing::{debug, info};

/// Builds the CRUD router for `R`. The router still needs `.with_state(ctx)`.
pub fn resource_routes<R: Resource>() -> Router<R::Context> {
    let collection = format!("/api/{}/", R::COLLECTION);
    let member = format!("/api/{}/:id/", R::COLLECTION);

    Router::new()
        .route(&collection, get(list::<R>).post(create::<R>))
        .route(
            &member,
            get(retrieve::<R>)
                .put(replace::<R>)
                .patch(update::<R>)
                .delete(destroy::<R>),
        )
}

async fn list<R: Resource>(State(ctx): State<R::Context>) -> Result<Json<Vec<R>>, ServiceError> {
    let items = R::list(&ctx).await.map_err(reject)?;
    debug!(resource = R::COLLECTION, count = items.len(), "List");
    Ok(Json(items))
}

async fn retrieve<R: Resource>(
    State(ctx): State<R::Context>,
    ResourceId(id): ResourceId,
) -> Result<Json<R>, ServiceError> {
    let item = R::fetch(&ctx, id).await.map_err(reject)?;
    debug!(resource = R::COLLECTION, id, found = item.is_some(), "Get");
    item.map(Json).ok_or_else(|| not_found::<R>(id))
}

async fn create<R: Resource>(
    State(ctx): State<R::Context>,
    ValidJson(params): ValidJson<R::Create>,
) -> Result<(StatusCode, Json<R>), ServiceError> {
    debug!(resource = R::COLLECTION, ?params, "Create");
    let item = R::create(&ctx, params).await.map_err(reject)?;
    info!(resource = R::COLLECTION, "Created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn replace<R: Resource>(
    State(ctx): State<R::Context>,
    ResourceId(id): ResourceId,
    ValidJson(params): ValidJson<R::Replace>,
) -> Result<Json<R>, ServiceError> {
    debug!(resource = R::COLLECTION, id, ?params, "Replace");
    apply_update::<R>(&ctx, id, params.into()).await
}

async fn update<R: Resource>(
    State(ctx): State<R::Context>,
    ResourceId(id): ResourceId,
    ValidJson(params): ValidJson<R::Update>,
) -> Result<Json<R>, ServiceError> {
    debug!(resource = R::COLLECTION, id, ?params, "Update");
    apply_update::<R>(&ctx, id, params).await
}

async fn apply_update<R: Resource>(
    ctx: &R::Context,
    id: i64,
    update: R::Update,
) -> Result<Json<R>, ServiceError> {
    let item = R::update(ctx, id, update)
        .await
        .map_err(reject)?
        .ok_or_else(|| not_found::<R>(id))?;
    info!(resource = R::COLLECTION, id, "Updated");
    Ok(Json(item))
}

async fn destroy<R: Resource>(
    State(ctx): State<R::Context>,
    ResourceId(id): ResourceId,
) -> Result<StatusCode, ServiceError> {
    if R::delete(&ctx, id).await.map_err(reject)? {
        info!(resource = R::COLLECTION, id, "Deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found::<R>(id))
    }
}
