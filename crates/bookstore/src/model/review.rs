use super::explicit_null;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One user's rating of one book. A user reviews a given book at most once.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Review {
    pub id: i64,
    pub book_id: i64,
    pub user_id: i64,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for `POST /api/reviews/` and `PUT /api/reviews/{id}/`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewCreate {
    pub book_id: i64,
    pub user_id: i64,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReviewUpdate {
    pub book_id: Option<i64>,
    pub user_id: Option<i64>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i64>,
    #[serde(default, deserialize_with = "explicit_null")]
    pub comment: Option<Option<String>>,
}

impl From<ReviewCreate> for ReviewUpdate {
    fn from(c: ReviewCreate) -> Self {
        Self {
            book_id: Some(c.book_id),
            user_id: Some(c.user_id),
            rating: Some(c.rating),
            comment: Some(c.comment),
        }
    }
}

impl Review {
    pub fn apply(&mut self, update: ReviewUpdate) {
        if let Some(book_id) = update.book_id {
            self.book_id = book_id;
        }
        if let Some(user_id) = update.user_id {
            self.user_id = user_id;
        }
        if let Some(rating) = update.rating {
            self.rating = rating;
        }
        if let Some(comment) = update.comment {
            self.comment = comment;
        }
    }
}

/// `GET /api/reviews/by_book/` response.
#[derive(Debug, Clone, Serialize)]
pub struct BookReviews {
    pub book_id: i64,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub reviews: Vec<Review>,
}

/// `GET /api/reviews/book_statistics/` response.
#[derive(Debug, Clone, Serialize)]
pub struct BookStatistics {
    pub book_id: i64,
    pub average_rating: f64,
    pub total_reviews: i64,
    pub rating_distribution: Vec<RatingCount>,
}

/// How many reviews gave `rating`. Only ratings that occur are listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RatingCount {
    pub rating: i64,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        for (rating, ok) in [(0, false), (1, true), (5, true), (6, false)] {
            let review = ReviewCreate {
                book_id: 1,
                user_id: 1,
                rating,
                comment: None,
            };
            assert_eq!(review.validate().is_ok(), ok, "rating {rating}");
        }
    }

    #[test]
    fn test_update_rating_message() {
        let update = ReviewUpdate {
            rating: Some(9),
            ..Default::default()
        };
        let errors = service_framework::FieldErrors::from(update.validate().unwrap_err());
        assert_eq!(errors.get("rating").unwrap(), ["Rating must be between 1 and 5"]);
    }
}
