//! Rating aggregates for one book.
//!
//! The average is the arithmetic mean rounded to two places, half away from zero;
//! a book with no reviews averages `0`. The distribution lists only the ratings
//! that occur, in ascending order.

use crate::model::{BookStatistics, RatingCount};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use sqlx::SqlitePool;

/// `(average_rating, total_reviews)` for `book_id`.
pub async fn rating_summary(pool: &SqlitePool, book_id: i64) -> Result<(f64, i64), sqlx::Error> {
    let (sum, total): (i64, i64) =
        sqlx::query_as("SELECT COALESCE(SUM(rating), 0), COUNT(*) FROM reviews WHERE book_id = ?")
            .bind(book_id)
            .fetch_one(pool)
            .await?;
    Ok((average(sum, total), total))
}

/// Exact mean of `total` ratings summing to `sum`, rounded to two places.
fn average(sum: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (Decimal::from(sum) / Decimal::from(total))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

pub async fn book_statistics(pool: &SqlitePool, book_id: i64) -> Result<BookStatistics, sqlx::Error> {
    let (average_rating, total_reviews) = rating_summary(pool, book_id).await?;
    let rating_distribution: Vec<RatingCount> = sqlx::query_as(
        "SELECT rating, COUNT(*) AS count FROM reviews WHERE book_id = ? \
         GROUP BY rating ORDER BY rating",
    )
    .bind(book_id)
    .fetch_all(pool)
    .await?;

    Ok(BookStatistics {
        book_id,
        average_rating,
        total_reviews,
        rating_distribution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review_service::SCHEMA;
    use service_framework::db;

    async fn pool_with_ratings(ratings: &[(i64, i64, i64)]) -> SqlitePool {
        let pool = db::connect("sqlite::memory:").await.unwrap();
        db::apply_schema(&pool, SCHEMA).await.unwrap();
        for (book_id, user_id, rating) in ratings {
            sqlx::query(
                "INSERT INTO reviews (book_id, user_id, rating, created_at, updated_at) \
                 VALUES (?, ?, ?, datetime('now'), datetime('now'))",
            )
            .bind(book_id)
            .bind(user_id)
            .bind(rating)
            .execute(&pool)
            .await
            .unwrap();
        }
        pool
    }

    #[tokio::test]
    async fn test_statistics_without_reviews() {
        let pool = pool_with_ratings(&[]).await;
        let stats = book_statistics(&pool, 7).await.unwrap();
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.total_reviews, 0);
        assert!(stats.rating_distribution.is_empty());
    }

    #[tokio::test]
    async fn test_statistics_average_and_sparse_distribution() {
        let pool = pool_with_ratings(&[(1, 1, 5), (1, 2, 4), (1, 3, 4), (2, 1, 1)]).await;
        let stats = book_statistics(&pool, 1).await.unwrap();
        assert_eq!(stats.total_reviews, 3);
        assert_eq!(stats.average_rating, 4.33);
        assert_eq!(
            stats.rating_distribution,
            vec![
                RatingCount { rating: 4, count: 2 },
                RatingCount { rating: 5, count: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_average_rounds_half_away_from_zero() {
        // (1 + 2 + 2 + 2 + 2 + 2 + 2 + 2) / 8 = 1.875
        let ratings: Vec<_> = (1..=8)
            .map(|user| (3, user, if user == 1 { 1 } else { 2 }))
            .collect();
        let pool = pool_with_ratings(&ratings).await;
        let (average, total) = rating_summary(&pool, 3).await.unwrap();
        assert_eq!(total, 8);
        assert_eq!(average, 1.88);
    }

    #[test]
    fn test_average_is_exact_before_rounding() {
        assert_eq!(average(0, 0), 0.0);
        assert_eq!(average(13, 3), 4.33);
        assert_eq!(average(5, 8), 0.63);
    }
}
