//! [`Resource`] implementation for [`User`].

use super::error::{unique_conflict, UserError};
use super::password::{hash_password, verify_password};
use crate::model::{User, UserRegistration, UserReplace, UserUpdate};
use async_trait::async_trait;
use chrono::Utc;
use service_framework::Resource;
use sqlx::SqlitePool;
use tracing::debug;

const SELECT_USER: &str = "SELECT id, username, email, first_name, last_name, phone, address, \
     date_joined, password_hash FROM users";

#[async_trait]
impl Resource for User {
    type Create = UserRegistration;
    type Update = UserUpdate;
    type Replace = UserReplace;
    type Context = SqlitePool;
    type Error = UserError;

    const COLLECTION: &'static str = "users";
    const NAME: &'static str = "User";

    async fn list(pool: &SqlitePool) -> Result<Vec<Self>, UserError> {
        let users = sqlx::query_as(&format!("{SELECT_USER} ORDER BY id"))
            .fetch_all(pool)
            .await?;
        Ok(users)
    }

    async fn fetch(pool: &SqlitePool, id: i64) -> Result<Option<Self>, UserError> {
        let user = sqlx::query_as(&format!("{SELECT_USER} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(user)
    }

    /// Registers a new account. The password is stored only as a salted digest.
    async fn create(pool: &SqlitePool, params: UserRegistration) -> Result<Self, UserError> {
        let password_hash = hash_password(&params.password);
        let user = sqlx::query_as(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, phone, \
             address, date_joined) VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING id, username, email, first_name, last_name, phone, address, \
             date_joined, password_hash",
        )
        .bind(params.username.trim())
        .bind(params.email.trim())
        .bind(password_hash)
        .bind(params.first_name)
        .bind(params.last_name)
        .bind(params.phone)
        .bind(params.address)
        .bind(Utc::now())
        .fetch_one(pool)
        .await
        .map_err(unique_conflict)?;
        Ok(user)
    }

    async fn update(
        pool: &SqlitePool,
        id: i64,
        update: UserUpdate,
    ) -> Result<Option<Self>, UserError> {
        let Some(mut user) = Self::fetch(pool, id).await? else {
            return Ok(None);
        };
        user.apply(update);
        sqlx::query(
            "UPDATE users SET username = ?, email = ?, first_name = ?, last_name = ?, \
             phone = ?, address = ? WHERE id = ?",
        )
        .bind(user.username.trim())
        .bind(user.email.trim())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.phone)
        .bind(&user.address)
        .bind(id)
        .execute(pool)
        .await
        .map_err(unique_conflict)?;
        Self::fetch(pool, id).await
    }

    async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, UserError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Checks a username/password pair.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> Result<User, UserError> {
    let user: Option<User> = sqlx::query_as(&format!("{SELECT_USER} WHERE username = ?"))
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;
    match user {
        Some(user) if verify_password(password, &user.password_hash) => Ok(user),
        _ => {
            debug!(username, "Login rejected");
            Err(UserError::InvalidCredentials)
        }
    }
}
