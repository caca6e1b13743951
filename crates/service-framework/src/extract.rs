//! # Request Extractors
//!
//! Axum's stock extractors answer bad input with 422 or plain-text bodies. These
//! wrappers keep every rejection inside [`ServiceError`] so clients always get the
//! JSON error shape:
//!
//! - [`ValidJson`] - JSON body, deserialized then run through `validator`.
//! - [`ResourceId`] - integer `:id` path segment; anything else is a 404.
//! - [`QueryParams`] - query string with "required parameter" helpers.

use crate::error::ServiceError;
use crate::validate::FieldErrors;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::str::FromStr;
use validator::Validate;

/// JSON body that has passed both deserialization and `Validate::validate`.
#[derive(Debug)]
pub struct ValidJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
        let value: T = serde_json::from_slice(&body)
            .map_err(|e| ServiceError::Validation(FieldErrors::from_json_error(&e)))?;
        value
            .validate()
            .map_err(|e| ServiceError::Validation(e.into()))?;
        Ok(Self(value))
    }
}

/// The integer id of a member route (`/api/books/:id/`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub i64);

#[async_trait]
impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ServiceError::NotFound("Not found".to_string()))?;
        raw.parse::<i64>()
            .map(Self)
            .map_err(|_| ServiceError::NotFound(format!("Not found: {raw}")))
    }
}

/// Raw query-string parameters for the derived filter routes.
#[derive(Debug, Default, Clone)]
pub struct QueryParams(HashMap<String, String>);

impl QueryParams {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self(params)
    }

    /// A non-empty string parameter, or `"<name> parameter required"`.
    pub fn required_str(&self, name: &str) -> Result<&str, ServiceError> {
        match self.0.get(name).map(String::as_str) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ServiceError::missing_parameter(name)),
        }
    }

    /// A required parameter parsed as `T` (usually an integer id).
    pub fn required<T: FromStr>(&self, name: &str) -> Result<T, ServiceError> {
        let raw = self.required_str(name)?;
        raw.trim()
            .parse::<T>()
            .map_err(|_| FieldErrors::single(name, "A valid integer is required.").into())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for QueryParams
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|e| ServiceError::BadRequest(e.body_text()))?;
        Ok(Self(params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> QueryParams {
        QueryParams::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_required_parameter_missing() {
        let err = params(&[]).required::<i64>("book_id").unwrap_err();
        assert_eq!(err.to_string(), "book_id parameter required");
    }

    #[test]
    fn test_empty_parameter_counts_as_missing() {
        let err = params(&[("author", "")]).required_str("author").unwrap_err();
        assert_eq!(err.to_string(), "author parameter required");
    }

    #[test]
    fn test_required_parameter_parsed() {
        let value: i64 = params(&[("user_id", "42")]).required("user_id").unwrap();
        assert_eq!(value, 42);

        let err = params(&[("user_id", "abc")]).required::<i64>("user_id").unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }
}
