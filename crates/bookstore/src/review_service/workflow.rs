//! # Review Submission
//!
//! 1. A user may review a book once. A second review is refused before any peer
//!    is called, so the answer doesn't depend on peer availability.
//! 2. The books service, then the users service, is asked whether the book and the
//!    user exist. A non-200 answer refuses the review (404). An unreachable peer is
//!    logged and the check is skipped.
//! 3. The review is written. The unique index catches a concurrent duplicate.

use super::error::{unique_conflict, ReviewError};
use super::ReviewContext;
use crate::model::{Review, ReviewCreate};
use chrono::Utc;
use service_framework::{PeerClient, Resource};
use sqlx::SqlitePool;
use tracing::{debug, info, instrument, warn};

#[instrument(skip(ctx, params), fields(book_id = params.book_id, user_id = params.user_id))]
pub async fn submit_review(ctx: &ReviewContext, params: ReviewCreate) -> Result<Review, ReviewError> {
    if already_reviewed(&ctx.pool, params.book_id, params.user_id).await? {
        return Err(ReviewError::AlreadyReviewed);
    }

    match ctx.books.get(params.book_id).await {
        Ok(Some(_)) => debug!("Book verified"),
        Ok(None) => return Err(ReviewError::BookNotFound(params.book_id)),
        Err(e) => warn!(error = %e, cause = %e.0, "Skipping book check"),
    }
    match ctx.users.get(params.user_id).await {
        Ok(Some(_)) => debug!("User verified"),
        Ok(None) => return Err(ReviewError::UserNotFound(params.user_id)),
        Err(e) => warn!(error = %e, cause = %e.0, "Skipping user check"),
    }

    let now = Utc::now();
    let (review_id,): (i64,) = sqlx::query_as(
        "INSERT INTO reviews (book_id, user_id, rating, comment, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(params.book_id)
    .bind(params.user_id)
    .bind(params.rating)
    .bind(params.comment)
    .bind(now)
    .bind(now)
    .fetch_one(&ctx.pool)
    .await
    .map_err(unique_conflict)?;
    info!(review_id, rating = params.rating, "Review created");

    Review::fetch(ctx, review_id)
        .await?
        .ok_or(ReviewError::Database(sqlx::Error::RowNotFound))
}

async fn already_reviewed(pool: &SqlitePool, book_id: i64, user_id: i64) -> Result<bool, sqlx::Error> {
    let existing: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM reviews WHERE book_id = ? AND user_id = ?")
            .bind(book_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?;
    Ok(existing.is_some())
}
