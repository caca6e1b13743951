//! # Users Service
//!
//! Owns accounts. Other services only ever call `GET /api/users/{id}/` to check that
//! a user exists.
//!
//! ## Structure
//!
//! - [`entity`] - [`Resource`](service_framework::Resource) implementation for [`User`](crate::model::User)
//! - [`actions`] - registration and login
//! - [`error`] - [`UserError`]
//! - [`password`] - salted digests
//!
//! ## Routes
//!
//! | Method | Path |
//! |--------|------|
//! | `GET`, `POST` | `/api/users/` |
//! | `GET`, `PUT`, `PATCH`, `DELETE` | `/api/users/{id}/` |
//! | `POST` | `/api/users/register/` |
//! | `POST` | `/api/users/login/` |

pub mod actions;
pub mod entity;
pub mod error;
pub mod password;

pub use error::*;

use crate::model::User;
use axum::routing::post;
use axum::Router;
use service_framework::resource_routes;
use sqlx::SqlitePool;

pub const SCHEMA: &[&str] = &["CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE COLLATE NOCASE,
        password_hash TEXT NOT NULL,
        first_name TEXT NOT NULL DEFAULT '',
        last_name TEXT NOT NULL DEFAULT '',
        phone TEXT NOT NULL DEFAULT '',
        address TEXT NOT NULL DEFAULT '',
        date_joined TEXT NOT NULL
    )"];

/// Builds the users service router.
pub fn router(pool: SqlitePool) -> Router {
    resource_routes::<User>()
        .route("/api/users/register/", post(actions::register))
        .route("/api/users/login/", post(actions::login))
        .with_state(pool)
}
