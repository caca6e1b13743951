//! # Observability & Tracing
//!
//! This module provides the tracing setup shared by every service.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! Every HTTP request gets its own span from `tower_http::trace::TraceLayer`, and the
//! workflows (order creation, payment settlement, review checks) log their steps inside it.
//!
//! ## Configuration
//!
//! - **Structured logging** with `tracing` crate
//! - **Configurable log levels** via `RUST_LOG` environment variable (default `info`)
//! - **Compact format** without module paths
//!
//! ## Usage Examples
//!
//! ```bash
//! # Default
//! cargo run -p bookstore -- orders
//!
//! # Show payloads and peer lookups
//! RUST_LOG=debug cargo run -p bookstore -- orders
//!
//! # Request spans from tower-http
//! RUST_LOG=info,tower_http=debug cargo run -p bookstore -- all
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=debug`**, an order creation reads:
//!
//! ```text
//! DEBUG Create resource="orders" params=OrderCreate { user_id: 1, ... }
//! DEBUG get{id=1 collection="users"}: Sending request
//! DEBUG get{id=1 collection="users"}: Peer lookup hit url=http://localhost:8001/api/users/1/
//! DEBUG get{id=5 collection="books"}: Sending request
//! DEBUG get{id=5 collection="books"}: Peer lookup hit url=http://localhost:8002/api/books/5/
//! INFO  Order created order_id=1 total_amount=19.98 items=1
//! ```
//!
//! A swallowed soft-dependency failure in the reviews service shows up as a `WARN`
//! line and the request carries on.
use tracing_subscriber::EnvFilter;

pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
