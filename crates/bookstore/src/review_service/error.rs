//! Error types for the reviews service.

use service_framework::ServiceError;
use thiserror::Error;

/// Errors that can occur during review operations.
///
/// Peer outages are not errors here: they are logged and the review is accepted.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// This user already has a review for this book.
    #[error("You have already reviewed this book")]
    AlreadyReviewed,

    /// The books service answered anything but 200 for this book.
    #[error("Book {0} not found")]
    BookNotFound(i64),

    /// The users service answered anything but 200 for this user.
    #[error("User {0} not found")]
    UserNotFound(i64),

    /// An underlying database error occurred.
    #[error("Review database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<ReviewError> for ServiceError {
    fn from(e: ReviewError) -> Self {
        let message = e.to_string();
        match e {
            ReviewError::AlreadyReviewed => ServiceError::Conflict(message),
            ReviewError::BookNotFound(_) | ReviewError::UserNotFound(_) => {
                ServiceError::NotFound(message)
            }
            ReviewError::Database(e) => ServiceError::Database(e),
        }
    }
}

pub(crate) fn unique_conflict(e: sqlx::Error) -> ReviewError {
    if service_framework::db::is_unique_violation(&e) {
        ReviewError::AlreadyReviewed
    } else {
        ReviewError::Database(e)
    }
}
