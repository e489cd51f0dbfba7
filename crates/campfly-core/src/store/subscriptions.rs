// ── Selection-driven subscription bookkeeping ──
//
// Keeps push-channel interest in sync with the focused campaign. The
// asymmetry is deliberate: registering is mandatory (a missed
// registration silently drops real-time updates), deregistering is
// best-effort (a stale subscription just produces events that match no
// cache entry and fall through the push handler).

use std::sync::Arc;
use std::sync::Mutex;

use tracing::debug;

use crate::gateway::PushChannel;
use crate::model::EntityId;

pub(crate) struct Subscriptions {
    channel: Arc<dyn PushChannel>,
    current: Mutex<Option<EntityId>>,
}

impl Subscriptions {
    pub(crate) fn new(channel: Arc<dyn PushChannel>) -> Self {
        Self {
            channel,
            current: Mutex::new(None),
        }
    }

    /// Register interest in `id`, dropping the previously tracked
    /// subscription when it differs.
    pub(crate) fn track(&self, id: &EntityId) {
        let mut current = self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if current.as_ref() == Some(id) {
            return;
        }
        if let Some(old) = current.take() {
            debug!(campaign_id = %old, "dropping push subscription");
            self.channel.unsubscribe_from_campaign(&old);
        }
        debug!(campaign_id = %id, "registering push subscription");
        self.channel.subscribe_to_campaign(id);
        *current = Some(id.clone());
    }

    /// Drop the subscription for `id` if it is the tracked one
    /// (used when the focused campaign is deleted).
    pub(crate) fn release(&self, id: &EntityId) {
        let mut current = self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if current.as_ref() == Some(id) {
            *current = None;
            debug!(campaign_id = %id, "releasing push subscription");
            self.channel.unsubscribe_from_campaign(id);
        }
    }

    /// Drop whatever subscription is tracked (used on reset).
    pub(crate) fn clear(&self) {
        let mut current = self.current.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(old) = current.take() {
            self.channel.unsubscribe_from_campaign(&old);
        }
    }
}
