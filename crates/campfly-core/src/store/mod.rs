//! Reactive campaign store: the cache, its request state, and the
//! push-subscription bookkeeping that follows focus changes.

mod campaign_store;
mod subscriptions;

pub use campaign_store::{CampaignStore, RequestState};
