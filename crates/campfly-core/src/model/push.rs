// ── Domain push events ──
//
// What the store's push handler consumes. The wire-level frames live in
// `campfly_api::push`; `convert` maps them into these.

use serde_json::Value;

use super::campaign::CampaignStatus;
use super::id::EntityId;

/// A push notification about one campaign.
#[derive(Debug, Clone)]
pub enum PushEvent {
    /// Lightweight status/progress tick. Applied as a shallow field
    /// merge -- the payload is trusted for exactly the fields it names.
    Status {
        id: EntityId,
        status: Option<CampaignStatus>,
        progress: Option<f64>,
    },

    /// "Something changed" signal. The `changes` payload may be partial
    /// or stale, so the store refetches the authoritative record instead
    /// of applying it verbatim.
    Changed { id: EntityId, changes: Value },
}

impl PushEvent {
    /// The campaign this event refers to.
    pub fn campaign_id(&self) -> &EntityId {
        match self {
            Self::Status { id, .. } | Self::Changed { id, .. } => id,
        }
    }
}
