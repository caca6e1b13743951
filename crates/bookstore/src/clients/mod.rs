//! Type-safe wrappers around [`ResourceClient`](service_framework::ResourceClient)
//! for the lookups one service makes against another.
//!
//! Each client reads a small snapshot of the peer's resource, only the fields the
//! calling workflow needs, and maps transport failures onto its own error.

pub mod book_client;
pub mod order_client;
pub mod user_client;

pub use book_client::*;
pub use order_client::*;
pub use user_client::*;
