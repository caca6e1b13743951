//! # PeerClient Trait
//!
//! Provides a common interface for service‑specific clients, adding a default `get`
//! method built on top of a generic `ResourceClient`.
use crate::{FrameworkError, RemoteResource, ResourceClient};
use async_trait::async_trait;

/// Trait for service-specific clients to inherit the standard lookup.
///
/// This trait reduces boilerplate: a domain client only says which
/// `ResourceClient` it wraps and how transport failures map onto its own
/// error type.
///
/// # Example
///
/// ```rust
/// use service_framework::{FrameworkError, PeerClient, RemoteResource, ResourceClient};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct UserRef { id: i64 }
///
/// impl RemoteResource for UserRef {
///     const COLLECTION: &'static str = "users";
/// }
///
/// #[derive(Debug)]
/// struct UsersDown(String);
///
/// struct UserClient { inner: ResourceClient<UserRef> }
///
/// impl PeerClient<UserRef> for UserClient {
///     type Error = UsersDown;
///
///     fn inner(&self) -> &ResourceClient<UserRef> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         UsersDown(e.to_string())
///     }
/// }
///
/// async fn usage(client: UserClient) {
///     // get() is provided automatically!
///     let _ = client.get(1).await;
/// }
/// ```
#[async_trait]
pub trait PeerClient<T: RemoteResource>: Send + Sync {
    /// The service-specific error type.
    type Error: Send;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map transport errors to the service-specific error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Look up an entity by ID. `Ok(None)` when the peer answered anything but 200.
    #[tracing::instrument(skip(self), fields(collection = T::COLLECTION))]
    async fn get(&self, id: i64) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }
}
