//! [`Resource`] implementation for [`Review`].

use super::error::{unique_conflict, ReviewError};
use super::workflow::submit_review;
use super::ReviewContext;
use crate::model::{Review, ReviewCreate, ReviewUpdate};
use async_trait::async_trait;
use chrono::Utc;
use service_framework::Resource;
use sqlx::SqlitePool;

const SELECT_REVIEW: &str =
    "SELECT id, book_id, user_id, rating, comment, created_at, updated_at FROM reviews";

const NEWEST_FIRST: &str = "ORDER BY created_at DESC, id DESC";

#[async_trait]
impl Resource for Review {
    type Create = ReviewCreate;
    type Update = ReviewUpdate;
    type Replace = ReviewCreate;
    type Context = ReviewContext;
    type Error = ReviewError;

    const COLLECTION: &'static str = "reviews";
    const NAME: &'static str = "Review";

    async fn list(ctx: &ReviewContext) -> Result<Vec<Self>, ReviewError> {
        let reviews = sqlx::query_as(&format!("{SELECT_REVIEW} {NEWEST_FIRST}"))
            .fetch_all(&ctx.pool)
            .await?;
        Ok(reviews)
    }

    async fn fetch(ctx: &ReviewContext, id: i64) -> Result<Option<Self>, ReviewError> {
        let review = sqlx::query_as(&format!("{SELECT_REVIEW} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&ctx.pool)
            .await?;
        Ok(review)
    }

    async fn create(ctx: &ReviewContext, params: ReviewCreate) -> Result<Self, ReviewError> {
        submit_review(ctx, params).await
    }

    /// Edits are not re-checked against the peers; moving a review onto a
    /// (book, user) pair that already has one is refused.
    async fn update(
        ctx: &ReviewContext,
        id: i64,
        update: ReviewUpdate,
    ) -> Result<Option<Self>, ReviewError> {
        let Some(mut review) = Self::fetch(ctx, id).await? else {
            return Ok(None);
        };
        review.apply(update);
        sqlx::query(
            "UPDATE reviews SET book_id = ?, user_id = ?, rating = ?, comment = ?, \
             updated_at = ? WHERE id = ?",
        )
        .bind(review.book_id)
        .bind(review.user_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(Utc::now())
        .bind(id)
        .execute(&ctx.pool)
        .await
        .map_err(unique_conflict)?;
        Self::fetch(ctx, id).await
    }

    async fn delete(ctx: &ReviewContext, id: i64) -> Result<bool, ReviewError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&ctx.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Reviews of `book_id`, newest first.
pub async fn reviews_of_book(pool: &SqlitePool, book_id: i64) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as(&format!("{SELECT_REVIEW} WHERE book_id = ? {NEWEST_FIRST}"))
        .bind(book_id)
        .fetch_all(pool)
        .await
}

/// Reviews written by `user_id`, newest first.
pub async fn reviews_by_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<Review>, sqlx::Error> {
    sqlx::query_as(&format!("{SELECT_REVIEW} WHERE user_id = ? {NEWEST_FIRST}"))
        .bind(user_id)
        .fetch_all(pool)
        .await
}
