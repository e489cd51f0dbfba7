//! Async Rust client for the Campfly campaign service REST API.
//!
//! [`CampaignClient`] wraps `reqwest` with bearer-token auth, the
//! service's `{"data": ...}` response envelope, and structured error
//! mapping. [`push`] defines the wire shape of the service's real-time
//! notification frames; the socket transport itself lives with the
//! application.
//!
//! Wire types stay deliberately loose (string statuses, flattened
//! extras) -- `campfly-core` converts them into a strict domain model.

pub mod client;
pub mod error;
pub mod models;
pub mod push;
pub mod transport;

pub use client::CampaignClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
