//! # Reviews Service
//!
//! Owns ratings. Unlike orders and payments, its peer checks are soft: a book or
//! user the peers report missing is refused, but an unreachable peer is logged
//! and ignored. See [`workflow`]; aggregates live in [`stats`].
//!
//! ## Structure
//!
//! - [`entity`] - [`Resource`](service_framework::Resource) implementation for [`Review`](crate::model::Review)
//! - [`workflow`] - review submission
//! - [`stats`] - average rating and rating distribution
//! - [`actions`] - `by_book`, `by_user`, `book_statistics`
//! - [`error`] - [`ReviewError`]

pub mod actions;
pub mod entity;
pub mod error;
pub mod stats;
pub mod workflow;

pub use error::*;

use crate::clients::{BookClient, UserClient};
use crate::model::Review;
use axum::routing::get;
use axum::Router;
use service_framework::resource_routes;
use sqlx::SqlitePool;

pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        book_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        rating INTEGER NOT NULL CHECK (rating BETWEEN 1 AND 5),
        comment TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL,
        UNIQUE (book_id, user_id)
    )",
    "CREATE INDEX IF NOT EXISTS idx_reviews_user ON reviews(user_id)",
];

/// State shared by every reviews handler.
#[derive(Debug, Clone)]
pub struct ReviewContext {
    pub pool: SqlitePool,
    pub books: BookClient,
    pub users: UserClient,
}

/// Builds the reviews service router.
pub fn router(ctx: ReviewContext) -> Router {
    resource_routes::<Review>()
        .route("/api/reviews/by_book/", get(actions::by_book))
        .route("/api/reviews/by_user/", get(actions::by_user))
        .route("/api/reviews/book_statistics/", get(actions::book_statistics))
        .with_state(ctx)
}
