//! # Mock Peers & Testing Guide
//!
//! The `MockPeer` type stands in for a peer service. It is a real HTTP server on an
//! ephemeral port that answers `GET /api/{collection}/{id}/` from a queue of
//! expectations, so a service under test talks to it through its normal
//! [`ResourceClient`](crate::ResourceClient) without any test-only code paths.
//!
//! ## When to use Mocks vs Real Services
//!
//! | Feature | MockPeer | Real Service |
//! |---------|----------|--------------|
//! | **Speed** | Instant (canned replies) | Fast (in-memory SQLite) |
//! | **Determinism** | 100% Deterministic | Depends on seeded data |
//! | **Error Injection** | Easy (`return_status`, `return_after`, `unreachable_url`) | Hard |
//! | **Use Case** | One service's workflow in isolation | End-to-end flows |
//!
//! ## Testing Strategies
//!
//! <details>
//! <summary><b>Pattern 1: Service with Mocked Peers (Sweet Spot)</b></summary>
//!
//! **When to use**: Testing a workflow that calls other services (order creation,
//! payment creation, review checks) while controlling exactly what the peers say.
//!
//! ```rust
//! use service_framework::mock::MockPeer;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() {
//!     let users = MockPeer::new("users");
//!     users.expect_get(1).return_ok(json!({ "id": 1, "username": "alice" }));
//!     users.expect_get(2).return_status(404);
//!
//!     let http = reqwest::Client::new();
//!     let found = http.get(format!("{}/api/users/1/", users.base_url())).send().await.unwrap();
//!     assert_eq!(found.status(), 200);
//!     let missing = http.get(format!("{}/api/users/2/", users.base_url())).send().await.unwrap();
//!     assert_eq!(missing.status(), 404);
//!
//!     users.verify();
//! }
//! ```
//! </details>
//!
//! <details>
//! <summary><b>Pattern 2: Full System Integration Test (Comprehensive)</b></summary>
//!
//! **When to use**: Testing every service wired together over real HTTP.
//!
//! See `BookstoreSystem::start_in_memory` in the `bookstore` crate and its
//! `tests/integration_test.rs`.
//! </details>
//!
//! ## Testing Failure Scenarios
//!
//! Downstream failures are the point of most workflow tests:
//!
//! - **Not found** – `expect_get(id).return_status(404)`
//! - **Timeout** – `expect_get(id).return_after(delay, body)` with a client timeout shorter than `delay`
//! - **Connection refused** – point the client at [`MockPeer::unreachable_url`]
//!
//! Expectations are consumed in order. A request that doesn't match the head of the
//! queue is answered with `500` and recorded; [`MockPeer::verify`] panics on it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// What the mock answers for one expected lookup.
#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Status(StatusCode),
    Delayed(Duration, Value),
}

#[derive(Debug)]
struct Expectation {
    id: i64,
    reply: Reply,
}

#[derive(Default)]
struct PeerLog {
    expectations: VecDeque<Expectation>,
    unexpected: Vec<String>,
    received: usize,
}

#[derive(Clone)]
struct PeerState {
    collection: &'static str,
    log: Arc<Mutex<PeerLog>>,
}

/// A fake peer service with expectation tracking.
///
/// # Example
/// ```ignore
/// let books = MockPeer::new("books");
/// books.expect_get(5).return_ok(json!({ "id": 5, "price": "9.99", "stock": 10 }));
///
/// let client = BookClient::new(&books.base_url(), Duration::from_secs(5))?;
/// // Use client in tests...
/// books.verify(); // Ensures all expectations were met
/// ```
pub struct MockPeer {
    collection: &'static str,
    addr: SocketAddr,
    log: Arc<Mutex<PeerLog>>,
    handle: JoinHandle<()>,
}

impl MockPeer {
    /// Starts a mock peer serving `/api/{collection}/{id}/`.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(collection: &'static str) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind mock peer");
        listener
            .set_nonblocking(true)
            .expect("set mock peer listener non-blocking");
        let addr = listener.local_addr().expect("mock peer address");
        let listener =
            tokio::net::TcpListener::from_std(listener).expect("register mock peer listener");

        let log = Arc::new(Mutex::new(PeerLog::default()));
        let state = PeerState {
            collection,
            log: log.clone(),
        };
        let app = Router::new()
            .route("/api/:collection/:id/", get(answer))
            .with_state(state);

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            collection,
            addr,
            log,
            handle,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Expects a `GET /api/{collection}/{id}/`.
    pub fn expect_get(&self, id: i64) -> GetExpectationBuilder {
        GetExpectationBuilder {
            id,
            log: self.log.clone(),
        }
    }

    /// Number of lookups received so far, expected or not.
    pub fn received(&self) -> usize {
        self.log.lock().expect("mock peer log poisoned").received
    }

    /// Verifies that all expectations were met and nothing else was asked.
    pub fn verify(&self) {
        let log = self.log.lock().expect("mock peer log poisoned");
        if !log.unexpected.is_empty() {
            panic!(
                "Mock {} received unexpected requests: {:?}",
                self.collection, log.unexpected
            );
        }
        if !log.expectations.is_empty() {
            panic!(
                "Not all expectations were met for mock {}. {} remaining: {:?}",
                self.collection,
                log.expectations.len(),
                log.expectations
            );
        }
    }

    /// A base URL nobody listens on: requests to it fail with connection refused.
    pub fn unreachable_url() -> String {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind throwaway listener");
        let addr = listener.local_addr().expect("throwaway listener address");
        drop(listener);
        format!("http://{addr}")
    }
}

impl Drop for MockPeer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Builder for `get` expectations.
pub struct GetExpectationBuilder {
    id: i64,
    log: Arc<Mutex<PeerLog>>,
}

impl GetExpectationBuilder {
    /// Answer `200 OK` with `body`.
    pub fn return_ok(self, body: Value) {
        self.push(Reply::Json(body));
    }

    /// Answer with an empty body and `status` (e.g. 404, 500).
    pub fn return_status(self, status: u16) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.push(Reply::Status(status));
    }

    /// Answer `200 OK` with `body`, but only after `delay`.
    pub fn return_after(self, delay: Duration, body: Value) {
        self.push(Reply::Delayed(delay, body));
    }

    fn push(self, reply: Reply) {
        let mut log = self.log.lock().expect("mock peer log poisoned");
        log.expectations.push_back(Expectation { id: self.id, reply });
    }
}

async fn answer(
    State(state): State<PeerState>,
    Path((collection, raw_id)): Path<(String, String)>,
) -> Response {
    let reply = {
        let mut log = state.log.lock().expect("mock peer log poisoned");
        log.received += 1;
        let request = format!("GET /api/{collection}/{raw_id}/");
        let id = raw_id.parse::<i64>().ok();

        let matches_head = collection == state.collection
            && id.is_some()
            && log.expectations.front().map(|e| Some(e.id)) == Some(id);
        if matches_head {
            log.expectations.pop_front().map(|e| e.reply)
        } else {
            log.unexpected.push(request);
            None
        }
    };

    match reply {
        Some(Reply::Json(body)) => (StatusCode::OK, Json(body)).into_response(),
        Some(Reply::Status(status)) => status.into_response(),
        Some(Reply::Delayed(delay, body)) => {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, Json(body)).into_response()
        }
        None => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_peer_with_expectations() {
        let peer = MockPeer::new("books");
        peer.expect_get(5)
            .return_ok(json!({ "id": 5, "price": "9.99", "stock": 10 }));
        peer.expect_get(6).return_status(404);

        let http = reqwest::Client::new();
        let hit = http
            .get(format!("{}/api/books/5/", peer.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(hit.status(), 200);
        let body: Value = hit.json().await.unwrap();
        assert_eq!(body["stock"], 10);

        let miss = http
            .get(format!("{}/api/books/6/", peer.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(miss.status(), 404);

        assert_eq!(peer.received(), 2);
        peer.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "unexpected requests")]
    async fn test_unexpected_request_fails_verification() {
        let peer = MockPeer::new("users");
        let http = reqwest::Client::new();
        let response = http
            .get(format!("{}/api/users/1/", peer.base_url()))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 500);
        peer.verify();
    }

    #[tokio::test]
    #[should_panic(expected = "Not all expectations were met")]
    async fn test_unmet_expectation_fails_verification() {
        let peer = MockPeer::new("orders");
        peer.expect_get(1).return_status(404);
        peer.verify();
    }

    #[tokio::test]
    async fn test_unreachable_url_refuses_connections() {
        let http = reqwest::Client::new();
        let result = http
            .get(format!("{}/api/users/1/", MockPeer::unreachable_url()))
            .send()
            .await;
        assert!(result.is_err());
    }
}
