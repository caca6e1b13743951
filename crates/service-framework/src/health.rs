//! Liveness endpoint.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

/// `GET /health` → `{"status": "healthy", "service": "<service>"}`.
pub fn health_routes<S>(service: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route(
        "/health",
        get(move || async move { Json(json!({ "status": "healthy", "service": service })) }),
    )
}
