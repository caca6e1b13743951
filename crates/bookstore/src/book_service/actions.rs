//! Catalog queries beyond CRUD: by category, by author, and title/author search.
//!
//! Matching is case-insensitive substring matching; results are ordered by id.

use super::entity::SELECT_BOOK;
use crate::model::Book;
use axum::extract::State;
use axum::Json;
use service_framework::{QueryParams, ServiceError};
use sqlx::SqlitePool;
use tracing::debug;

/// `GET /api/books/by_category/?category_id=`
pub async fn by_category(
    State(pool): State<SqlitePool>,
    params: QueryParams,
) -> Result<Json<Vec<Book>>, ServiceError> {
    let category_id: i64 = params.required("category_id")?;
    let books: Vec<Book> =
        sqlx::query_as(&format!("{SELECT_BOOK} WHERE b.category_id = ? ORDER BY b.id"))
            .bind(category_id)
            .fetch_all(&pool)
            .await?;
    debug!(category_id, count = books.len(), "Books by category");
    Ok(Json(books))
}

/// `GET /api/books/by_author/?author=`
pub async fn by_author(
    State(pool): State<SqlitePool>,
    params: QueryParams,
) -> Result<Json<Vec<Book>>, ServiceError> {
    let author = params.required_str("author")?;
    let books: Vec<Book> = sqlx::query_as(&format!(
        "{SELECT_BOOK} WHERE instr(lower(b.author), lower(?)) > 0 ORDER BY b.id"
    ))
    .bind(author)
    .fetch_all(&pool)
    .await?;
    debug!(author, count = books.len(), "Books by author");
    Ok(Json(books))
}

/// `GET /api/books/search/?q=` matches title or author.
pub async fn search(
    State(pool): State<SqlitePool>,
    params: QueryParams,
) -> Result<Json<Vec<Book>>, ServiceError> {
    let q = params.required_str("q")?;
    let books: Vec<Book> = sqlx::query_as(&format!(
        "{SELECT_BOOK} WHERE instr(lower(b.title), lower(?1)) > 0 \
         OR instr(lower(b.author), lower(?1)) > 0 ORDER BY b.id"
    ))
    .bind(q)
    .fetch_all(&pool)
    .await?;
    debug!(q, count = books.len(), "Book search");
    Ok(Json(books))
}
