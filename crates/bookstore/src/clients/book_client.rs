//! # Book Client
//!
//! Price and stock lookups against the books service.
use service_framework::{FrameworkError, Money, PeerClient, RemoteResource, ResourceClient};
use serde::Deserialize;
use std::time::Duration;

/// What other services read from `GET /api/books/{id}/`.
///
/// Missing `price` or `stock` read as `0`; `price` may be a number or a decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct BookSnapshot {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub price: Money,
    #[serde(default)]
    pub stock: i64,
}

impl RemoteResource for BookSnapshot {
    const COLLECTION: &'static str = "books";
}

/// The books service could not be reached, timed out, or sent an unreadable body.
#[derive(Debug, thiserror::Error)]
#[error("Unable to verify book. Books service unavailable.")]
pub struct BooksUnavailable(#[source] pub FrameworkError);

/// Client for the books service.
#[derive(Debug, Clone)]
pub struct BookClient {
    inner: ResourceClient<BookSnapshot>,
}

impl BookClient {
    pub fn new(inner: ResourceClient<BookSnapshot>) -> Self {
        Self { inner }
    }

    pub fn connect(base_url: &str, timeout: Duration) -> Result<Self, FrameworkError> {
        Ok(Self::new(ResourceClient::new(base_url, timeout)?))
    }
}

impl PeerClient<BookSnapshot> for BookClient {
    type Error = BooksUnavailable;

    fn inner(&self) -> &ResourceClient<BookSnapshot> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        BooksUnavailable(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_framework::mock::MockPeer;
    use serde_json::json;

    #[tokio::test]
    async fn test_snapshot_reads_string_price_and_defaults() {
        let books = MockPeer::new("books");
        books
            .expect_get(5)
            .return_ok(json!({ "id": 5, "price": "9.99", "stock": 10 }));
        books.expect_get(6).return_ok(json!({ "id": 6 }));

        let client = BookClient::connect(&books.base_url(), Duration::from_secs(5)).unwrap();
        let book = client.get(5).await.unwrap().unwrap();
        assert_eq!(book.price.to_string(), "9.99");
        assert_eq!(book.stock, 10);

        let bare = client.get(6).await.unwrap().unwrap();
        assert_eq!(bare.price, Money::ZERO);
        assert_eq!(bare.stock, 0);

        books.verify();
    }

    #[tokio::test]
    async fn test_missing_book_is_none() {
        let books = MockPeer::new("books");
        books.expect_get(9).return_status(404);

        let client = BookClient::connect(&books.base_url(), Duration::from_secs(5)).unwrap();
        assert!(client.get(9).await.unwrap().is_none());
        books.verify();
    }

    #[tokio::test]
    async fn test_unreachable_books_service() {
        let client =
            BookClient::connect(&MockPeer::unreachable_url(), Duration::from_secs(1)).unwrap();
        let err = client.get(1).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unable to verify book. Books service unavailable."
        );
    }
}
