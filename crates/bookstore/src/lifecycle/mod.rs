//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the services.
//!
//! ## Wiring
//!
//! Each service gets its dependencies handed to it at startup as an explicit
//! context: a database pool plus the peer clients it calls.
//!
//! | Service | Context | Calls |
//! |---------|---------|-------|
//! | users | `SqlitePool` | nobody |
//! | books | `SqlitePool` | nobody |
//! | orders | [`OrderContext`](crate::order_service::OrderContext) | users, books |
//! | payments | [`PaymentContext`](crate::payment_service::PaymentContext) | orders |
//! | reviews | [`ReviewContext`](crate::review_service::ReviewContext) | books, users |
//!
//! The call graph is acyclic, so [`BookstoreSystem::start_in_memory`] can start the
//! leaves first and hand their real addresses to the services that call them.
//!
//! ## Graceful Shutdown
//!
//! [`BookstoreSystem::shutdown`] stops callers before the services they call
//! (reviews, payments, orders, books, users), and each server drains its in-flight
//! requests before its task ends.
//!
//! ## Observability
//!
//! Tracing is set up once by the binary with
//! [`setup_tracing`](service_framework::tracing::setup_tracing); every request runs
//! in its own span.

pub mod bookstore_system;
pub mod service;

pub use bookstore_system::*;
pub use service::*;
