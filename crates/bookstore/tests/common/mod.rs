#![allow(dead_code)]

use bookstore::config::{PeerUrls, ServiceKind, Settings};
use bookstore::lifecycle::start_service;
use reqwest::Response;
use serde_json::Value;
use service_framework::ServiceServer;
use std::time::Duration;

pub fn peers(users: &str, books: &str, orders: &str) -> PeerUrls {
    PeerUrls {
        users: users.to_string(),
        books: books.to_string(),
        orders: orders.to_string(),
    }
}

/// Starts one service on an ephemeral port with an in-memory database.
pub async fn start(kind: ServiceKind, peers: PeerUrls) -> ServiceServer {
    start_service(&Settings::in_memory(kind, peers))
        .await
        .expect("service starts")
}

pub async fn start_with_timeout(kind: ServiceKind, peers: PeerUrls, timeout: Duration) -> ServiceServer {
    let mut settings = Settings::in_memory(kind, peers);
    settings.peer_timeout = timeout;
    start_service(&settings).await.expect("service starts")
}

pub async fn json(response: Response) -> Value {
    response.json().await.expect("JSON body")
}
