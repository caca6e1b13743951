//! # Books Service
//!
//! Owns the catalog: books and their categories. The orders service reads a book's
//! `price` and `stock` through `GET /api/books/{id}/`; nothing outside this service
//! ever writes stock.
//!
//! ## Structure
//!
//! - [`entity`] - [`Resource`](service_framework::Resource) implementations for
//!   [`Book`](crate::model::Book) and [`Category`](crate::model::Category)
//! - [`actions`] - `by_category`, `by_author`, `search`
//! - [`error`] - [`BookError`]

pub mod actions;
pub mod entity;
pub mod error;

pub use error::*;

use crate::model::{Book, Category};
use axum::routing::get;
use axum::Router;
use service_framework::resource_routes;
use sqlx::SqlitePool;

pub const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        created_at TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS books (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        author TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        price TEXT NOT NULL,
        category_id INTEGER REFERENCES categories(id) ON DELETE SET NULL,
        stock INTEGER NOT NULL DEFAULT 0 CHECK (stock >= 0),
        isbn TEXT NOT NULL DEFAULT '',
        published_date TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_books_category ON books(category_id)",
];

/// Builds the books service router.
pub fn router(pool: SqlitePool) -> Router {
    resource_routes::<Category>()
        .merge(resource_routes::<Book>())
        .route("/api/books/by_category/", get(actions::by_category))
        .route("/api/books/by_author/", get(actions::by_author))
        .route("/api/books/search/", get(actions::search))
        .with_state(pool)
}
