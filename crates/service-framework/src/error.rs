//! # Framework Errors
//!
//! This module defines the common error types used throughout the service framework.
//! By centralizing error definitions, every service answers failures with the same
//! status codes and the same JSON body shape.
//!
//! - [`FrameworkError`] - transport-level failures while calling a peer service.
//! - [`ServiceError`] - the single HTTP-facing error every handler returns.

use crate::validate::FieldErrors;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

/// Errors that can occur while talking to a peer service.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// The peer could not be reached, timed out, or answered with an unreadable body.
    #[error("Peer unavailable at {url}: {source}")]
    Unavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The HTTP client itself could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors surfaced to HTTP callers.
///
/// Every variant except [`ServiceError::Validation`] renders as `{"error": "<message>"}`.
/// Validation failures render the field map directly, e.g. `{"rating": ["..."]}`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    #[error("{0}")]
    BadRequest(String),

    /// Uniqueness violations (duplicate review, duplicate order item).
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    InvalidStateTransition(String),

    #[error("{0}")]
    NotFound(String),

    /// A hard dependency could not be reached.
    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl ServiceError {
    /// Error for a derived route called without its query parameter.
    pub fn missing_parameter(name: &str) -> Self {
        ServiceError::BadRequest(format!("{name} parameter required"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_)
            | ServiceError::BadRequest(_)
            | ServiceError::Conflict(_)
            | ServiceError::InvalidStateTransition(_) => StatusCode::BAD_REQUEST,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServiceError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::Validation(errors)
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ServiceError::Validation(errors) => (status, Json(errors)).into_response(),
            ServiceError::Database(e) => {
                error!(error = %e, "Database error");
                (status, Json(json!({ "error": "Internal server error" }))).into_response()
            }
            other => (status, Json(json!({ "error": other.to_string() }))).into_response(),
        }
    }
}

/// Converts any domain error into a [`ServiceError`].
///
/// Handy as `.map_err(reject)?` where the `?` operator alone can't pick the target type.
pub fn reject<E: Into<ServiceError>>(e: E) -> ServiceError {
    e.into()
}
