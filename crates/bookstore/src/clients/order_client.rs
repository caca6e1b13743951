//! # Order Client
//!
//! Order total lookups against the orders service, used by payments.
use service_framework::{FrameworkError, Money, PeerClient, RemoteResource, ResourceClient};
use serde::Deserialize;
use std::time::Duration;

/// What the payments service reads from `GET /api/orders/{id}/`.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderSnapshot {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub total_amount: Money,
}

impl RemoteResource for OrderSnapshot {
    const COLLECTION: &'static str = "orders";
}

#[derive(Debug, thiserror::Error)]
#[error("Unable to verify order. Orders service unavailable.")]
pub struct OrdersUnavailable(#[source] pub FrameworkError);

/// Client for the orders service.
#[derive(Debug, Clone)]
pub struct OrderClient {
    inner: ResourceClient<OrderSnapshot>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<OrderSnapshot>) -> Self {
        Self { inner }
    }

    pub fn connect(base_url: &str, timeout: Duration) -> Result<Self, FrameworkError> {
        Ok(Self::new(ResourceClient::new(base_url, timeout)?))
    }
}

impl PeerClient<OrderSnapshot> for OrderClient {
    type Error = OrdersUnavailable;

    fn inner(&self) -> &ResourceClient<OrderSnapshot> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrdersUnavailable(e)
    }
}
