//! Error types for the users service.

use service_framework::{FieldErrors, ServiceError, NON_FIELD_ERRORS};
use thiserror::Error;

/// Errors that can occur during user operations.
#[derive(Debug, Error)]
pub enum UserError {
    /// Another account already has this username.
    #[error("A user with that username already exists.")]
    UsernameTaken,

    /// Another account already has this email.
    #[error("A user with that email already exists.")]
    EmailTaken,

    /// Login with an unknown username or a wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An underlying database error occurred.
    #[error("User database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<UserError> for ServiceError {
    fn from(e: UserError) -> Self {
        let message = e.to_string();
        match e {
            UserError::UsernameTaken => FieldErrors::single("username", message).into(),
            UserError::EmailTaken => FieldErrors::single("email", message).into(),
            UserError::InvalidCredentials => FieldErrors::single(NON_FIELD_ERRORS, message).into(),
            UserError::Database(e) => ServiceError::Database(e),
        }
    }
}

/// Classifies a failed insert/update against the `users` unique columns.
pub(crate) fn unique_conflict(e: sqlx::Error) -> UserError {
    if !service_framework::db::is_unique_violation(&e) {
        return UserError::Database(e);
    }
    let on_email = e
        .as_database_error()
        .is_some_and(|db| db.message().contains("users.email"));
    if on_email {
        UserError::EmailTaken
    } else {
        UserError::UsernameTaken
    }
}
