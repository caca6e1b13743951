//! # Resource Trait
//!
//! The `Resource` trait defines the contract that every owned entity (Book, Order,
//! Payment, ...) implements to be served by the generic CRUD router. It specifies
//! associated types for payloads, injected context, and errors, and the five
//! storage operations the router calls.
//!
//! # Architecture Note
//! By defining one contract that all resource types satisfy, the HTTP plumbing in
//! [`crate::routes`] is written *once* and reused for every table.
//!
//! Associated types keep payloads apart: a `Book` route only accepts a `BookCreate`
//! body, and the compiler rejects wiring an `OrderCreate` into it.
//!
//! # Create vs. read shapes
//! The read shape is `Self`. Create, full update (PUT) and partial update (PATCH)
//! each get their own payload type, picked by the route rather than by branching
//! on the request at runtime.

use crate::error::ServiceError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::Debug;
use validator::Validate;

/// Trait that any owned entity must implement to be mounted with
/// [`resource_routes`](crate::routes::resource_routes).
///
/// # Context
/// `Context` is the service state injected into every operation: the database pool
/// and any peer clients the entity needs. It is handed over explicitly by the router,
/// never looked up from a global.
#[async_trait]
pub trait Resource: Serialize + Send + Sync + Sized + 'static {
    /// Payload for `POST /api/{collection}/`.
    type Create: DeserializeOwned + Validate + Send + Debug;

    /// Payload for `PATCH /api/{collection}/{id}/`. Every field optional.
    type Update: DeserializeOwned + Validate + Send + Debug;

    /// Payload for `PUT /api/{collection}/{id}/`. Converted into an `Update`
    /// with every writable field set.
    type Replace: DeserializeOwned + Validate + Into<Self::Update> + Send + Debug;

    /// The service state this resource needs.
    type Context: Clone + Send + Sync + 'static;

    /// The error type for this resource.
    ///
    /// Each resource keeps its own error enum; the router converts it into a
    /// [`ServiceError`] only at the HTTP boundary.
    type Error: std::error::Error + Into<ServiceError> + Send + Sync + 'static;

    /// URL segment, e.g. `books` for `/api/books/`.
    const COLLECTION: &'static str;

    /// Display name used in "not found" messages, e.g. `Book`.
    const NAME: &'static str;

    async fn list(ctx: &Self::Context) -> Result<Vec<Self>, Self::Error>;

    async fn fetch(ctx: &Self::Context, id: i64) -> Result<Option<Self>, Self::Error>;

    async fn create(ctx: &Self::Context, params: Self::Create) -> Result<Self, Self::Error>;

    /// Applies a partial update. `Ok(None)` when the row does not exist.
    async fn update(
        ctx: &Self::Context,
        id: i64,
        update: Self::Update,
    ) -> Result<Option<Self>, Self::Error>;

    /// `Ok(false)` when the row does not exist.
    async fn delete(ctx: &Self::Context, id: i64) -> Result<bool, Self::Error>;
}

/// The 404 raised for a missing member of `R`.
pub fn not_found<R: Resource>(id: i64) -> ServiceError {
    ServiceError::NotFound(format!("{} {} not found", R::NAME, id))
}
