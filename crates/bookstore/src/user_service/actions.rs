//! Account endpoints beyond CRUD: registration and login.

use super::entity::authenticate;
use crate::model::{LoginRequest, User, UserRegistration};
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use service_framework::{reject, Resource, ServiceError, ValidJson};
use sqlx::SqlitePool;
use tracing::info;

/// `{"message": ..., "user": {...}}`
#[derive(Debug, Serialize)]
pub struct AccountResponse {
    pub message: &'static str,
    pub user: User,
}

/// `POST /api/users/register/`
pub async fn register(
    State(pool): State<SqlitePool>,
    ValidJson(params): ValidJson<UserRegistration>,
) -> Result<(StatusCode, Json<AccountResponse>), ServiceError> {
    let user = User::create(&pool, params).await.map_err(reject)?;
    info!(user_id = user.id, username = %user.username, "User registered");
    Ok((
        StatusCode::CREATED,
        Json(AccountResponse {
            message: "User registered successfully",
            user,
        }),
    ))
}

/// `POST /api/users/login/`. Verifies credentials; no session is issued.
pub async fn login(
    State(pool): State<SqlitePool>,
    ValidJson(params): ValidJson<LoginRequest>,
) -> Result<Json<AccountResponse>, ServiceError> {
    let user = authenticate(&pool, &params.username, &params.password)
        .await
        .map_err(reject)?;
    info!(user_id = user.id, "Login successful");
    Ok(Json(AccountResponse {
        message: "Login successful",
        user,
    }))
}
