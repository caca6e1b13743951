//! # User Client
//!
//! Existence checks against the users service, used by orders and reviews.
use service_framework::{FrameworkError, PeerClient, RemoteResource, ResourceClient};
use serde::Deserialize;
use std::time::Duration;

/// What other services read from `GET /api/users/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub username: String,
}

impl RemoteResource for UserRef {
    const COLLECTION: &'static str = "users";
}

/// The users service could not be reached, timed out, or sent an unreadable body.
#[derive(Debug, thiserror::Error)]
#[error("Unable to verify user. Users service unavailable.")]
pub struct UsersUnavailable(#[source] pub FrameworkError);

/// Client for the users service.
#[derive(Debug, Clone)]
pub struct UserClient {
    inner: ResourceClient<UserRef>,
}

impl UserClient {
    pub fn new(inner: ResourceClient<UserRef>) -> Self {
        Self { inner }
    }

    pub fn connect(base_url: &str, timeout: Duration) -> Result<Self, FrameworkError> {
        Ok(Self::new(ResourceClient::new(base_url, timeout)?))
    }
}

impl PeerClient<UserRef> for UserClient {
    type Error = UsersUnavailable;

    fn inner(&self) -> &ResourceClient<UserRef> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        UsersUnavailable(e)
    }
}
