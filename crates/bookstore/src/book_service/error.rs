//! Error types for the books service.

use service_framework::{FieldErrors, ServiceError};
use thiserror::Error;

/// Errors that can occur during book and category operations.
#[derive(Debug, Error)]
pub enum BookError {
    /// The referenced category does not exist.
    #[error("Invalid pk \"{0}\" - object does not exist.")]
    UnknownCategory(i64),

    /// An underlying database error occurred.
    #[error("Book database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<BookError> for ServiceError {
    fn from(e: BookError) -> Self {
        match e {
            BookError::UnknownCategory(_) => FieldErrors::single("category", e.to_string()).into(),
            BookError::Database(e) => ServiceError::Database(e),
        }
    }
}
