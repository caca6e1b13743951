//! Data shapes owned by each service.
//!
//! Every entity has a read shape (the struct itself, serialised in responses) and
//! separate create/update payloads chosen by the endpoint. Payloads derive
//! [`Validate`](validator::Validate) for the business rules serde can't express.

pub mod book;
pub mod category;
pub mod order;
pub mod payment;
pub mod review;
pub mod user;

pub use book::*;
pub use category::*;
pub use order::*;
pub use payment::*;
pub use review::*;
pub use user::*;

use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` (`Some(None)`) from an absent field (`None`)
/// in partial updates. Use with `#[serde(default, deserialize_with = "explicit_null")]`.
pub(crate) fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Optional on input but never `null`. Use with `#[serde(default, deserialize_with = "non_null")]`.
pub(crate) fn non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
