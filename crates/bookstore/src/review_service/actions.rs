//! Review queries beyond CRUD.

use super::entity::{reviews_by_user, reviews_of_book};
use super::stats::{book_statistics as statistics_for, rating_summary};
use super::ReviewContext;
use crate::model::{BookReviews, BookStatistics, Review};
use axum::extract::State;
use axum::Json;
use service_framework::{QueryParams, ServiceError};
use tracing::debug;

/// `GET /api/reviews/by_book/?book_id=` with the book's average and count.
pub async fn by_book(
    State(ctx): State<ReviewContext>,
    params: QueryParams,
) -> Result<Json<BookReviews>, ServiceError> {
    let book_id: i64 = params.required("book_id")?;
    let reviews = reviews_of_book(&ctx.pool, book_id).await?;
    let (average_rating, total_reviews) = rating_summary(&ctx.pool, book_id).await?;
    Ok(Json(BookReviews {
        book_id,
        average_rating,
        total_reviews,
        reviews,
    }))
}

/// `GET /api/reviews/by_user/?user_id=`
pub async fn by_user(
    State(ctx): State<ReviewContext>,
    params: QueryParams,
) -> Result<Json<Vec<Review>>, ServiceError> {
    let user_id: i64 = params.required("user_id")?;
    Ok(Json(reviews_by_user(&ctx.pool, user_id).await?))
}

/// `GET /api/reviews/book_statistics/?book_id=`
pub async fn book_statistics(
    State(ctx): State<ReviewContext>,
    params: QueryParams,
) -> Result<Json<BookStatistics>, ServiceError> {
    let book_id: i64 = params.required("book_id")?;
    let stats = statistics_for(&ctx.pool, book_id).await?;
    debug!(book_id, total_reviews = stats.total_reviews, "Book statistics");
    Ok(Json(stats))
}
