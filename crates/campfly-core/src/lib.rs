//! Reactive data layer between `campfly-api` and UI consumers.
//!
//! This crate owns the domain model and the synchronization logic that
//! keeps a client-side campaign cache consistent across REST mutations,
//! refetches, and real-time push events:
//!
//! - **[`CampaignStore`]** — Central reactive cache built on
//!   `tokio::sync::watch` channels. Holds the campaign collection, the
//!   focused campaign, its contact list, and transient request state.
//!   Every operation applies its cache writes synchronously once the
//!   gateway response arrives, so observers never see partial updates.
//!
//! - **[`CampaignGateway`] / [`PushChannel`]** — The store's two injected
//!   dependencies: a typed async interface to the campaign service and a
//!   registration surface for per-campaign push interest. `campfly-api`'s
//!   [`CampaignClient`](campfly_api::CampaignClient) implements the
//!   gateway; tests swap in scripted fakes.
//!
//! - **[`CollectionStream<T>`] / [`FocusStream`]** — Subscription
//!   handles vended by the store. Expose snapshots, awaitable change
//!   notification, and a `Stream` adapter for reactive rendering.
//!
//! - **Domain model** ([`model`]) — Canonical types (`Campaign`,
//!   `Contact`, strong status enums, [`PushEvent`]) with [`EntityId`]
//!   supporting both UUID and opaque service identifiers.

pub mod convert;
pub mod error;
pub mod gateway;
pub mod model;
pub mod rest;
pub mod store;
pub mod stream;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use gateway::{
    CampaignChanges, CampaignDraft, CampaignGateway, CampaignQuery, ContactChanges, ContactDraft,
    ContactImportReport, PushChannel,
};
pub use store::{CampaignStore, RequestState};
pub use stream::{CollectionStream, FocusStream};

// Re-export model types at the crate root for ergonomics.
pub use model::{
    Campaign, CampaignKind, CampaignStatistics, CampaignStatus, Contact, ContactStatus, EntityId,
    PushEvent,
};
