//! # Service Framework
//!
//! This crate provides the foundational building blocks shared by the bookstore's
//! independently deployable HTTP services. It implements a **Resource-Oriented
//! Architecture (ROA)**: every service owns a few relational resources and exposes
//! the same CRUD surface for each of them.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Resource Layer** ([`Resource`]) - your entity, its payloads, and how it is stored
//! 2. **HTTP Layer** ([`resource_routes`], [`ServiceServer`]) - routing, extraction, error rendering
//! 3. **Peer Layer** ([`ResourceClient`], [`PeerClient`]) - type-safe lookups against other services
//!
//! This separation means you write the storage logic **once** per entity, and the
//! framework handles routing, request validation, status codes and error bodies.
//!
//! ## Core Abstractions
//!
//! ### [`Resource`] - The Business Logic
//!
//! Each entity says what its create/update payloads look like, which service state it
//! needs (`Context`), and how to list/fetch/create/update/delete rows.
//!
//! ### [`ResourceClient`] - Talking to Peers
//!
//! Services coordinate only through synchronous `GET {base}/api/{collection}/{id}/`
//! lookups. A `ResourceClient<T>` performs one such lookup with a timeout and reports:
//!
//! - `Ok(Some(T))` - the peer answered 200 with a readable body
//! - `Ok(None)` - the peer answered anything else
//! - `Err(FrameworkError::Unavailable)` - the peer could not be reached in time
//!
//! Whether "unavailable" aborts a write or is ignored is the calling workflow's decision.
//!
//! ## Context Injection
//!
//! Dependencies are handed to handlers explicitly through axum state: each service
//! builds one `Context` (database pool + peer clients) at startup and the router
//! passes it into every [`Resource`] operation. There are no process-wide singletons.
//!
//! ## Error Model
//!
//! Handlers return [`ServiceError`], which renders as `{"error": "..."}` (or a
//! field-error map for validation failures) with the matching status code.
//!
//! ## Testing
//!
//! The [`mock`] module provides **MockPeer**, a real HTTP server with canned answers
//! and expectation tracking, for testing a service's workflows without running its peers.

pub mod client;
pub mod client_trait;
pub mod db;
pub mod error;
pub mod extract;
pub mod health;
pub mod mock;
pub mod money;
pub mod resource;
pub mod routes;
pub mod server;
pub mod tracing;
pub mod validate;

// Re-export core types for convenience
pub use client::{RemoteResource, ResourceClient, DEFAULT_PEER_TIMEOUT};
pub use client_trait::PeerClient;
pub use error::{reject, FrameworkError, ServiceError};
pub use extract::{QueryParams, ResourceId, ValidJson};
pub use money::Money;
pub use resource::{not_found, Resource};
pub use routes::resource_routes;
pub use server::ServiceServer;
pub use validate::{not_blank, rule, FieldErrors, NON_FIELD_ERRORS};
pub use validator::Validate;
