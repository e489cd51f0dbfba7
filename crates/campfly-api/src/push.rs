//! Wire shapes for push notifications.
//!
//! The campaign service publishes real-time updates on two topics:
//!
//! - `campaign:status` — lightweight status/progress ticks
//! - `campaign:updated` — "something changed, refetch" signals with an
//!   advisory (possibly partial) `changes` payload
//!
//! This module only defines the payload shapes and the topic parser.
//! The socket transport itself (connect/reconnect/heartbeat) is the
//! application's concern; it hands decoded frames to
//! `campfly_core::CampaignStore::on_push_event`.

use serde::{Deserialize, Serialize};

/// Topic for subscribing to a campaign's updates.
pub const TOPIC_SUBSCRIBE: &str = "campaign:subscribe";
/// Topic for dropping a campaign subscription.
pub const TOPIC_UNSUBSCRIBE: &str = "campaign:unsubscribe";
/// Topic carrying status/progress ticks.
pub const TOPIC_STATUS: &str = "campaign:status";
/// Topic carrying full-update signals.
pub const TOPIC_UPDATED: &str = "campaign:updated";

/// Payload of a push frame, camelCase on the wire.
///
/// `status`/`progress` accompany `campaign:status` frames; `changes`
/// accompanies `campaign:updated` frames. All are optional because the
/// service treats the payload as advisory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushPayload {
    pub campaign_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub changes: Option<serde_json::Value>,
}

/// A decoded push frame: topic plus payload.
#[derive(Debug, Clone)]
pub enum PushFrame {
    Status(PushPayload),
    Updated(PushPayload),
}

impl PushFrame {
    /// Decode a frame from its topic name and raw JSON payload.
    ///
    /// Returns `None` for unknown topics or malformed payloads -- push
    /// traffic is best-effort and unknown frames are simply dropped.
    pub fn parse(topic: &str, payload: &serde_json::Value) -> Option<Self> {
        let payload: PushPayload = serde_json::from_value(payload.clone()).ok()?;
        match topic {
            TOPIC_STATUS => Some(Self::Status(payload)),
            TOPIC_UPDATED => Some(Self::Updated(payload)),
            _ => None,
        }
    }

    /// The campaign this frame refers to.
    pub fn campaign_id(&self) -> &str {
        match self {
            Self::Status(p) | Self::Updated(p) => &p.campaign_id,
        }
    }
}
