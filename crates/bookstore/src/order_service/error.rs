//! Error types for the orders service.

use crate::clients::{BooksUnavailable, UsersUnavailable};
use service_framework::ServiceError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The users service answered anything but 200 for this user.
    #[error("User {0} not found")]
    UserNotFound(i64),

    /// The books service answered anything but 200 for this book.
    #[error("Book {0} not found")]
    BookNotFound(i64),

    /// The book has fewer copies in stock than the line asks for.
    #[error("Insufficient stock for book {0}")]
    InsufficientStock(i64),

    /// The same book appears on two lines of one order.
    #[error("Duplicate book {0} in order items")]
    DuplicateItem(i64),

    /// `update_status` got a missing or unknown status.
    #[error("Invalid status")]
    InvalidStatus,

    #[error(transparent)]
    UsersUnavailable(#[from] UsersUnavailable),

    #[error(transparent)]
    BooksUnavailable(#[from] BooksUnavailable),

    /// An underlying database error occurred.
    #[error("Order database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<OrderError> for ServiceError {
    fn from(e: OrderError) -> Self {
        let message = e.to_string();
        match e {
            OrderError::UserNotFound(_) | OrderError::BookNotFound(_) => {
                ServiceError::NotFound(message)
            }
            OrderError::InsufficientStock(_) | OrderError::InvalidStatus => {
                ServiceError::BadRequest(message)
            }
            OrderError::DuplicateItem(_) => ServiceError::Conflict(message),
            OrderError::UsersUnavailable(_) | OrderError::BooksUnavailable(_) => {
                ServiceError::ServiceUnavailable(message)
            }
            OrderError::Database(e) => ServiceError::Database(e),
        }
    }
}
