//! # Bookstore Services
//!
//! Five independently deployable HTTP services (users, books, orders, payments,
//! reviews) built on [`service_framework`]. Each owns its own SQLite database and
//! talks to the others only through `GET /api/{collection}/{id}/` lookups.
//!
//! - **[model]**: read shapes and create/update payloads for every entity.
//! - **[clients]**: typed peer clients ([`UserClient`](clients::UserClient),
//!   [`BookClient`](clients::BookClient), [`OrderClient`](clients::OrderClient)).
//! - **[user_service]**, **[book_service]**, **[order_service]**,
//!   **[payment_service]**, **[review_service]**: one module per service.
//! - **[config]**: per-service [`Settings`](config::Settings) from the environment.
//! - **[lifecycle]**: starting one service, or all five with
//!   [`BookstoreSystem`](lifecycle::BookstoreSystem).

pub mod book_service;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod order_service;
pub mod payment_service;
pub mod review_service;
pub mod user_service;
