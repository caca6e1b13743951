//! # Generic Peer Client
//!
//! This module defines the generic client services use to look up each other's
//! resources over HTTP.

use crate::error::FrameworkError;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Default timeout applied to every peer lookup.
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(5);

/// The slice of a peer's resource this service reads.
///
/// Implementors are usually small "snapshot" structs carrying only the fields the
/// caller needs (a book's `price` and `stock`, an order's `total_amount`).
pub trait RemoteResource: DeserializeOwned + Send + 'static {
    /// URL segment on the peer, e.g. `books` for `GET {base}/api/books/{id}/`.
    const COLLECTION: &'static str;
}

/// ## ResourceClient
///
/// The `ResourceClient<T>` issues single-resource lookups against a peer service:
/// `GET {base}/api/{collection}/{id}/`.
///
/// * **Cloneable** – holds a shared `reqwest::Client` and the base URL, so cloning is inexpensive.
/// * **Bounded** – every request carries the configured timeout (5s by default).
/// * **Existence semantics** – any status other than `200 OK` means "not there" (`Ok(None)`).
///   Transport failures, timeouts and unreadable bodies are [`FrameworkError::Unavailable`].
///
/// No retries, no caching: each call is one request.
pub struct ResourceClient<T: RemoteResource> {
    http: reqwest::Client,
    base_url: Arc<str>,
    _resource: PhantomData<fn() -> T>,
}

impl<T: RemoteResource> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: RemoteResource> std::fmt::Debug for ResourceClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.base_url)
            .field("collection", &T::COLLECTION)
            .finish()
    }
}

impl<T: RemoteResource> ResourceClient<T> {
    /// Builds a client with its own connection pool and the given timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FrameworkError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Reuses an existing `reqwest::Client` (and its timeout).
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http,
            base_url: Arc::from(base_url.trim_end_matches('/')),
            _resource: PhantomData,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_url(&self, id: i64) -> String {
        format!("{}/api/{}/{}/", self.base_url, T::COLLECTION, id)
    }

    pub async fn get(&self, id: i64) -> Result<Option<T>, FrameworkError> {
        let url = self.resource_url(id);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|source| FrameworkError::Unavailable {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!(%url, %status, "Peer lookup missed");
            return Ok(None);
        }

        let item = response
            .json::<T>()
            .await
            .map_err(|source| FrameworkError::Unavailable {
                url: url.clone(),
                source,
            })?;
        debug!(%url, "Peer lookup hit");
        Ok(Some(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Widget {}

    impl RemoteResource for Widget {
        const COLLECTION: &'static str = "widgets";
    }

    #[test]
    fn test_resource_url_trims_trailing_slash() {
        let client =
            ResourceClient::<Widget>::new("http://widgets.local:9000/", DEFAULT_PEER_TIMEOUT)
                .unwrap();
        assert_eq!(client.base_url(), "http://widgets.local:9000");
        assert_eq!(
            client.resource_url(7),
            "http://widgets.local:9000/api/widgets/7/"
        );
    }
}
