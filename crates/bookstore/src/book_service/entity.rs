//! [`Resource`] implementations for [`Category`] and [`Book`].
//!
//! Both live in the same database; a book's `category_name` is joined in on every read.

use super::error::BookError;
use crate::model::{Book, BookCreate, BookUpdate, Category, CategoryCreate, CategoryUpdate};
use async_trait::async_trait;
use chrono::Utc;
use service_framework::Resource;
use sqlx::SqlitePool;

pub(crate) const SELECT_BOOK: &str = "SELECT b.id, b.title, b.author, b.description, b.price, \
     b.category_id AS category, c.name AS category_name, b.stock, b.isbn, b.published_date, \
     b.created_at, b.updated_at \
     FROM books b LEFT JOIN categories c ON c.id = b.category_id";

const SELECT_CATEGORY: &str = "SELECT id, name, description, created_at FROM categories";

#[async_trait]
impl Resource for Category {
    type Create = CategoryCreate;
    type Update = CategoryUpdate;
    type Replace = CategoryCreate;
    type Context = SqlitePool;
    type Error = BookError;

    const COLLECTION: &'static str = "categories";
    const NAME: &'static str = "Category";

    async fn list(pool: &SqlitePool) -> Result<Vec<Self>, BookError> {
        let categories = sqlx::query_as(&format!("{SELECT_CATEGORY} ORDER BY id"))
            .fetch_all(pool)
            .await?;
        Ok(categories)
    }

    async fn fetch(pool: &SqlitePool, id: i64) -> Result<Option<Self>, BookError> {
        let category = sqlx::query_as(&format!("{SELECT_CATEGORY} WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(category)
    }

    async fn create(pool: &SqlitePool, params: CategoryCreate) -> Result<Self, BookError> {
        let category = sqlx::query_as(
            "INSERT INTO categories (name, description, created_at) VALUES (?, ?, ?) \
             RETURNING id, name, description, created_at",
        )
        .bind(params.name.trim())
        .bind(params.description)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;
        Ok(category)
    }

    async fn update(
        pool: &SqlitePool,
        id: i64,
        update: CategoryUpdate,
    ) -> Result<Option<Self>, BookError> {
        let Some(mut category) = Self::fetch(pool, id).await? else {
            return Ok(None);
        };
        category.apply(update);
        sqlx::query("UPDATE categories SET name = ?, description = ? WHERE id = ?")
            .bind(category.name.trim())
            .bind(&category.description)
            .bind(id)
            .execute(pool)
            .await?;
        Self::fetch(pool, id).await
    }

    /// Books in the category keep existing with their category cleared.
    async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, BookError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl Resource for Book {
    type Create = BookCreate;
    type Update = BookUpdate;
    type Replace = BookCreate;
    type Context = SqlitePool;
    type Error = BookError;

    const COLLECTION: &'static str = "books";
    const NAME: &'static str = "Book";

    async fn list(pool: &SqlitePool) -> Result<Vec<Self>, BookError> {
        let books = sqlx::query_as(&format!("{SELECT_BOOK} ORDER BY b.id"))
            .fetch_all(pool)
            .await?;
        Ok(books)
    }

    async fn fetch(pool: &SqlitePool, id: i64) -> Result<Option<Self>, BookError> {
        let book = sqlx::query_as(&format!("{SELECT_BOOK} WHERE b.id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(book)
    }

    async fn create(pool: &SqlitePool, params: BookCreate) -> Result<Self, BookError> {
        ensure_category(pool, params.category).await?;
        let now = Utc::now();
        let (id,): (i64,) = sqlx::query_as(
            "INSERT INTO books (title, author, description, price, category_id, stock, isbn, \
             published_date, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?) \
             RETURNING id",
        )
        .bind(params.title.trim())
        .bind(params.author.trim())
        .bind(params.description)
        .bind(params.price)
        .bind(params.category)
        .bind(params.stock)
        .bind(params.isbn)
        .bind(params.published_date)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await?;
        let book = Self::fetch(pool, id).await?;
        book.ok_or(BookError::Database(sqlx::Error::RowNotFound))
    }

    async fn update(
        pool: &SqlitePool,
        id: i64,
        update: BookUpdate,
    ) -> Result<Option<Self>, BookError> {
        let Some(mut book) = Self::fetch(pool, id).await? else {
            return Ok(None);
        };
        book.apply(update);
        ensure_category(pool, book.category).await?;
        sqlx::query(
            "UPDATE books SET title = ?, author = ?, description = ?, price = ?, \
             category_id = ?, stock = ?, isbn = ?, published_date = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(book.title.trim())
        .bind(book.author.trim())
        .bind(&book.description)
        .bind(book.price)
        .bind(book.category)
        .bind(book.stock)
        .bind(&book.isbn)
        .bind(book.published_date)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;
        Self::fetch(pool, id).await
    }

    async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, BookError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

async fn ensure_category(pool: &SqlitePool, category: Option<i64>) -> Result<(), BookError> {
    let Some(category_id) = category else {
        return Ok(());
    };
    let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM categories WHERE id = ?")
        .bind(category_id)
        .fetch_optional(pool)
        .await?;
    match exists {
        Some(_) => Ok(()),
        None => Err(BookError::UnknownCategory(category_id)),
    }
}
