// ── Central reactive campaign store ──
//
// Single source of truth for campaign state visible to the view layer.
// Arbitrates between REST results and push events: gateway responses
// replace whole records, push status ticks merge only the fields they
// name, and push "updated" signals trigger an authoritative refetch.
//
// Concurrency: every cache write is a synchronous `send_modify` with no
// await between response arrival and cache update. Concurrent
// operations on the same id are NOT serialized -- last write wins per
// field, and a gateway response is always authoritative for the fields
// it returns. An update response landing after a push tick can discard
// the tick's freshness; that is the accepted trade-off, not a bug.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::gateway::{
    CampaignChanges, CampaignDraft, CampaignGateway, CampaignQuery, ContactChanges, ContactDraft,
    ContactImportReport, PushChannel,
};
use crate::model::{Campaign, CampaignStatus, Contact, EntityId, PushEvent};
use crate::stream::{CollectionStream, FocusStream};

use super::subscriptions::Subscriptions;

/// Transient request state, global to the store.
///
/// `is_loading` reflects "a loading-tracked operation is in flight" only
/// approximately: overlapping calls each toggle it around their own
/// await, so it must not be used for mutual exclusion. `error` holds the
/// last failure message; the next tracked operation clears it.
#[derive(Debug, Clone, Default)]
pub struct RequestState {
    pub is_loading: bool,
    pub error: Option<String>,
    pub last_updated: Option<DateTime<Utc>>,
}

/// The reactive campaign cache.
///
/// Construct one per session with injected gateway and push-channel
/// dependencies; the application wires `on_push_event` to its socket
/// layer at startup. All mutations flow through the operations below --
/// the view layer only ever reads snapshots and subscriptions.
pub struct CampaignStore {
    gateway: Arc<dyn CampaignGateway>,
    subscriptions: Subscriptions,

    /// Collection cache: insertion-ordered, no duplicate ids.
    campaigns: watch::Sender<Arc<Vec<Arc<Campaign>>>>,
    /// The campaign currently selected for detail view, if any.
    focused: watch::Sender<Option<Arc<Campaign>>>,
    /// Contacts of the focused campaign. Cleared when focus clears.
    contacts: watch::Sender<Arc<Vec<Arc<Contact>>>>,
    request: watch::Sender<RequestState>,
}

impl CampaignStore {
    pub fn new(gateway: Arc<dyn CampaignGateway>, channel: Arc<dyn PushChannel>) -> Self {
        let (campaigns, _) = watch::channel(Arc::new(Vec::new()));
        let (focused, _) = watch::channel(None);
        let (contacts, _) = watch::channel(Arc::new(Vec::new()));
        let (request, _) = watch::channel(RequestState::default());

        Self {
            gateway,
            subscriptions: Subscriptions::new(channel),
            campaigns,
            focused,
            contacts,
            request,
        }
    }

    // ── Read operations ──────────────────────────────────────────────
    //
    // Reads swallow errors: they record `error` and log, but never
    // return `Err`, so a failed background refresh cannot crash the
    // calling view. The previous cache contents stay untouched.

    /// Fetch all campaigns matching `query` and replace the collection
    /// cache wholesale (stale entries from an old filter are discarded).
    pub async fn fetch_campaigns(&self, query: Option<&CampaignQuery>) {
        self.begin_load();

        match self.gateway.list(query).await {
            Ok(list) => {
                let snapshot: Arc<Vec<Arc<Campaign>>> =
                    Arc::new(list.into_iter().map(Arc::new).collect());
                info!(count = snapshot.len(), "campaigns fetched");
                self.campaigns.send_modify(|c| *c = snapshot);
                self.finish_load_ok();
            }
            Err(e) => {
                warn!(error = %e, "campaign list fetch failed");
                self.finish_load_err(&e);
            }
        }
    }

    /// Fetch one campaign, upsert it into the collection (replace-by-id
    /// only -- a record absent from the collection is not appended), set
    /// it focused, and register push interest in it.
    pub async fn fetch_campaign(&self, id: &EntityId) {
        self.begin_load();

        match self.gateway.get(id).await {
            Ok(campaign) => {
                let campaign = Arc::new(campaign);
                self.replace_in_collection(&campaign);
                self.focused.send_modify(|f| *f = Some(Arc::clone(&campaign)));
                self.subscriptions.track(id);
                debug!(campaign_id = %id, "campaign fetched");
                self.finish_load_ok();
            }
            Err(e) => {
                // Prior focus is deliberately left in place.
                warn!(campaign_id = %id, error = %e, "campaign fetch failed");
                self.finish_load_err(&e);
            }
        }
    }

    /// Fetch the focused campaign's contact list, replacing the
    /// secondary collection wholesale.
    pub async fn fetch_contacts(&self, campaign_id: &EntityId) {
        self.begin_load();

        match self.gateway.list_contacts(campaign_id).await {
            Ok(list) => {
                let snapshot: Arc<Vec<Arc<Contact>>> =
                    Arc::new(list.into_iter().map(Arc::new).collect());
                info!(campaign_id = %campaign_id, count = snapshot.len(), "contacts fetched");
                self.contacts.send_modify(|c| *c = snapshot);
                self.finish_load_ok();
            }
            Err(e) => {
                warn!(campaign_id = %campaign_id, error = %e, "contact fetch failed");
                self.finish_load_err(&e);
            }
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Set (or clear) the focused campaign. Pure local operation; when
    /// focusing, push interest is registered for the new id. Clearing
    /// focus leaves any existing subscription alone -- over-subscription
    /// is the safe degradation.
    pub fn select_campaign(&self, campaign: Option<Campaign>) {
        match campaign {
            Some(campaign) => {
                let id = campaign.id.clone();
                self.focused.send_modify(|f| *f = Some(Arc::new(campaign)));
                self.subscriptions.track(&id);
            }
            None => {
                self.focused.send_modify(|f| *f = None);
            }
        }
    }

    // ── Write operations ─────────────────────────────────────────────
    //
    // Writes record `error` AND return `Err`, so the invoking form can
    // show an inline failure in addition to the store-level banner.

    /// Create a campaign; on success it is prepended to the collection
    /// and returned (so a form can navigate to it).
    pub async fn create_campaign(&self, draft: &CampaignDraft) -> Result<Arc<Campaign>, CoreError> {
        self.begin_load();

        match self.gateway.create(draft).await {
            Ok(campaign) => {
                let campaign = Arc::new(campaign);
                info!(campaign_id = %campaign.id, "campaign created");
                self.prepend_to_collection(Arc::clone(&campaign));
                self.finish_load_ok();
                Ok(campaign)
            }
            Err(e) => {
                warn!(error = %e, "campaign create failed");
                self.finish_load_err(&e);
                Err(e)
            }
        }
    }

    /// Update a campaign. The collection entry and the focused entity
    /// are replaced from the same response in one synchronous step, so
    /// they can never diverge. On failure the cache is untouched.
    pub async fn update_campaign(
        &self,
        id: &EntityId,
        changes: &CampaignChanges,
    ) -> Result<Arc<Campaign>, CoreError> {
        self.begin_load();

        match self.gateway.update(id, changes).await {
            Ok(campaign) => {
                let campaign = Arc::new(campaign);
                self.replace_in_collection(&campaign);
                info!(campaign_id = %id, "campaign updated");
                self.finish_load_ok();
                Ok(campaign)
            }
            Err(e) => {
                warn!(campaign_id = %id, error = %e, "campaign update failed");
                self.finish_load_err(&e);
                Err(e)
            }
        }
    }

    /// Delete a campaign. If it was focused, focus and the contact list
    /// are cleared and its push subscription is released.
    pub async fn delete_campaign(&self, id: &EntityId) -> Result<(), CoreError> {
        self.begin_load();

        match self.gateway.delete(id).await {
            Ok(()) => {
                self.campaigns
                    .send_modify(|snapshot| {
                        let retained: Vec<Arc<Campaign>> = snapshot
                            .iter()
                            .filter(|c| c.id != *id)
                            .map(Arc::clone)
                            .collect();
                        *snapshot = Arc::new(retained);
                    });
                let was_focused = self
                    .focused
                    .borrow()
                    .as_ref()
                    .is_some_and(|f| f.id == *id);
                if was_focused {
                    self.focused.send_modify(|f| *f = None);
                    self.contacts.send_modify(|c| *c = Arc::new(Vec::new()));
                }
                self.subscriptions.release(id);
                info!(campaign_id = %id, "campaign deleted");
                self.finish_load_ok();
                Ok(())
            }
            Err(e) => {
                warn!(campaign_id = %id, error = %e, "campaign delete failed");
                self.finish_load_err(&e);
                Err(e)
            }
        }
    }

    // ── Control actions ──────────────────────────────────────────────
    //
    // Control-plane failures are non-fatal to the triggering flow: the
    // error is recorded and logged, and the tagged outcome is returned
    // for the caller to surface (or not). `is_loading` is not toggled.

    /// Start a campaign.
    pub async fn start_campaign(&self, id: &EntityId) -> Result<Arc<Campaign>, CoreError> {
        let result = self.gateway.start(id).await;
        self.finish_control("start", id, result)
    }

    /// Pause a running campaign.
    pub async fn pause_campaign(&self, id: &EntityId) -> Result<Arc<Campaign>, CoreError> {
        let result = self.gateway.pause(id).await;
        self.finish_control("pause", id, result)
    }

    /// Stop a campaign.
    pub async fn stop_campaign(&self, id: &EntityId) -> Result<Arc<Campaign>, CoreError> {
        let result = self.gateway.stop(id).await;
        self.finish_control("stop", id, result)
    }

    /// Duplicate a campaign; the copy is prepended to the collection and
    /// returned.
    pub async fn duplicate_campaign(
        &self,
        id: &EntityId,
        name: Option<&str>,
    ) -> Result<Arc<Campaign>, CoreError> {
        match self.gateway.duplicate(id, name).await {
            Ok(copy) => {
                let copy = Arc::new(copy);
                info!(source_id = %id, new_id = %copy.id, "campaign duplicated");
                self.prepend_to_collection(Arc::clone(&copy));
                self.touch();
                Ok(copy)
            }
            Err(e) => {
                warn!(campaign_id = %id, error = %e, "campaign duplicate failed");
                self.record_error(&e);
                Err(e)
            }
        }
    }

    fn finish_control(
        &self,
        verb: &'static str,
        id: &EntityId,
        result: Result<Campaign, CoreError>,
    ) -> Result<Arc<Campaign>, CoreError> {
        match result {
            Ok(campaign) => {
                let campaign = Arc::new(campaign);
                self.replace_in_collection(&campaign);
                self.touch();
                info!(campaign_id = %id, action = verb, "campaign control action applied");
                Ok(campaign)
            }
            Err(e) => {
                warn!(campaign_id = %id, action = verb, error = %e, "campaign control action failed");
                self.record_error(&e);
                Err(e)
            }
        }
    }

    // ── Contact writes ───────────────────────────────────────────────

    /// Bulk-import contacts, then refetch the contact list. The local
    /// cache is never patched directly: the service computes derived
    /// counters, so a refetch is the only way to stay consistent.
    pub async fn add_contacts(
        &self,
        campaign_id: &EntityId,
        rows: &[ContactDraft],
    ) -> Result<ContactImportReport, CoreError> {
        match self.gateway.add_contacts(campaign_id, rows).await {
            Ok(report) => {
                info!(
                    campaign_id = %campaign_id,
                    added = report.added,
                    failed = report.failed,
                    "contacts imported"
                );
                self.fetch_contacts(campaign_id).await;
                Ok(report)
            }
            Err(e) => {
                warn!(campaign_id = %campaign_id, error = %e, "contact import failed");
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Update one contact, replacing it in the secondary collection.
    pub async fn update_contact(
        &self,
        campaign_id: &EntityId,
        contact_id: &EntityId,
        changes: &ContactChanges,
    ) -> Result<Arc<Contact>, CoreError> {
        match self
            .gateway
            .update_contact(campaign_id, contact_id, changes)
            .await
        {
            Ok(contact) => {
                let contact = Arc::new(contact);
                self.contacts.send_modify(|snapshot| {
                    let replaced: Vec<Arc<Contact>> = snapshot
                        .iter()
                        .map(|c| {
                            if c.id == contact.id {
                                Arc::clone(&contact)
                            } else {
                                Arc::clone(c)
                            }
                        })
                        .collect();
                    *snapshot = Arc::new(replaced);
                });
                self.touch();
                info!(campaign_id = %campaign_id, contact_id = %contact_id, "contact updated");
                Ok(contact)
            }
            Err(e) => {
                warn!(contact_id = %contact_id, error = %e, "contact update failed");
                self.record_error(&e);
                Err(e)
            }
        }
    }

    /// Remove one contact from the campaign and the local cache.
    pub async fn remove_contact(
        &self,
        campaign_id: &EntityId,
        contact_id: &EntityId,
    ) -> Result<(), CoreError> {
        match self.gateway.remove_contact(campaign_id, contact_id).await {
            Ok(()) => {
                self.contacts.send_modify(|snapshot| {
                    let retained: Vec<Arc<Contact>> = snapshot
                        .iter()
                        .filter(|c| c.id != *contact_id)
                        .map(Arc::clone)
                        .collect();
                    *snapshot = Arc::new(retained);
                });
                self.touch();
                info!(campaign_id = %campaign_id, contact_id = %contact_id, "contact removed");
                Ok(())
            }
            Err(e) => {
                warn!(contact_id = %contact_id, error = %e, "contact remove failed");
                self.record_error(&e);
                Err(e)
            }
        }
    }

    // ── Push events ──────────────────────────────────────────────────

    /// Handle a push notification.
    ///
    /// Status ticks are merged shallowly into the matching collection
    /// entry and the focused campaign -- no REST call, and no effect if
    /// nothing matches (redundant events for unfocused ids are ignored).
    /// "Changed" signals refetch the authoritative record instead of
    /// trusting the advisory payload; reconciliation failures are logged
    /// only, since they represent a failed best-effort background sync.
    pub async fn on_push_event(&self, event: PushEvent) {
        match event {
            PushEvent::Status {
                id,
                status,
                progress,
            } => self.merge_status(&id, status, progress),
            PushEvent::Changed { id, changes } => {
                debug!(campaign_id = %id, ?changes, "push update signal, reconciling");
                match self.gateway.get(&id).await {
                    Ok(campaign) => {
                        let campaign = Arc::new(campaign);
                        self.replace_in_collection(&campaign);
                        self.touch();
                    }
                    Err(e) => {
                        warn!(campaign_id = %id, error = %e, "push reconciliation failed");
                    }
                }
            }
        }
    }

    /// Shallow merge of a status tick: only the named fields change.
    fn merge_status(
        &self,
        id: &EntityId,
        status: Option<CampaignStatus>,
        progress: Option<f64>,
    ) {
        let mut matched = false;

        self.campaigns.send_modify(|snapshot| {
            let next: Vec<Arc<Campaign>> = snapshot
                .iter()
                .map(|c| {
                    if c.id == *id {
                        matched = true;
                        Arc::new(c.merged_status(status, progress))
                    } else {
                        Arc::clone(c)
                    }
                })
                .collect();
            *snapshot = Arc::new(next);
        });

        // Focus may legitimately be absent from the collection (deep
        // link before the list loaded), so merge it independently.
        self.focused.send_modify(|focused| {
            if let Some(current) = focused.clone() {
                if current.id == *id {
                    matched = true;
                    *focused = Some(Arc::new(current.merged_status(status, progress)));
                }
            }
        });

        if matched {
            self.touch();
            debug!(campaign_id = %id, ?status, ?progress, "push status tick applied");
        } else {
            debug!(campaign_id = %id, "push status tick ignored (no matching cache entry)");
        }
    }

    // ── Error / lifecycle ────────────────────────────────────────────

    /// Clear the last error. No other side effects.
    pub fn clear_error(&self) {
        self.request.send_modify(|r| r.error = None);
    }

    /// Restore every field to its initial value and drop any push
    /// subscription. Used on logout.
    pub fn reset(&self) {
        self.campaigns.send_modify(|c| *c = Arc::new(Vec::new()));
        self.focused.send_modify(|f| *f = None);
        self.contacts.send_modify(|c| *c = Arc::new(Vec::new()));
        self.request.send_modify(|r| *r = RequestState::default());
        self.subscriptions.clear();
        debug!("campaign store reset");
    }

    // ── Selectors ────────────────────────────────────────────────────

    /// Current collection snapshot (cheap `Arc` clone).
    pub fn campaigns_snapshot(&self) -> Arc<Vec<Arc<Campaign>>> {
        self.campaigns.borrow().clone()
    }

    /// The focused campaign, if any.
    pub fn focused(&self) -> Option<Arc<Campaign>> {
        self.focused.borrow().clone()
    }

    /// Current contact list snapshot.
    pub fn contacts_snapshot(&self) -> Arc<Vec<Arc<Contact>>> {
        self.contacts.borrow().clone()
    }

    /// Look up a campaign in the collection cache by id.
    pub fn campaign_by_id(&self, id: &EntityId) -> Option<Arc<Campaign>> {
        self.campaigns
            .borrow()
            .iter()
            .find(|c| c.id == *id)
            .map(Arc::clone)
    }

    pub fn campaign_count(&self) -> usize {
        self.campaigns.borrow().len()
    }

    /// Whether a loading-tracked operation is in flight (approximate;
    /// see [`RequestState`]).
    pub fn is_loading(&self) -> bool {
        self.request.borrow().is_loading
    }

    /// The last recorded error message, if any.
    pub fn error(&self) -> Option<String> {
        self.request.borrow().error.clone()
    }

    /// When the cache last changed from a successful operation.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.request.borrow().last_updated
    }

    // ── Subscriptions (view layer) ───────────────────────────────────

    pub fn subscribe_campaigns(&self) -> CollectionStream<Campaign> {
        CollectionStream::new(self.campaigns.subscribe())
    }

    pub fn subscribe_contacts(&self) -> CollectionStream<Contact> {
        CollectionStream::new(self.contacts.subscribe())
    }

    pub fn subscribe_focused(&self) -> FocusStream {
        FocusStream::new(self.focused.subscribe())
    }

    pub fn subscribe_request_state(&self) -> watch::Receiver<RequestState> {
        self.request.subscribe()
    }

    // ── Private cache helpers (synchronous, no awaits) ───────────────

    /// Replace the collection entry and the focused campaign matching
    /// `updated.id`. Records absent from the collection are NOT
    /// appended -- only `fetch_campaigns` and create/duplicate grow it.
    fn replace_in_collection(&self, updated: &Arc<Campaign>) {
        self.campaigns.send_modify(|snapshot| {
            let next: Vec<Arc<Campaign>> = snapshot
                .iter()
                .map(|c| {
                    if c.id == updated.id {
                        Arc::clone(updated)
                    } else {
                        Arc::clone(c)
                    }
                })
                .collect();
            *snapshot = Arc::new(next);
        });

        self.focused.send_modify(|focused| {
            if focused.as_ref().is_some_and(|f| f.id == updated.id) {
                *focused = Some(Arc::clone(updated));
            }
        });
    }

    /// Prepend a freshly created campaign (newest first, matching the
    /// service's default sort).
    fn prepend_to_collection(&self, campaign: Arc<Campaign>) {
        self.campaigns.send_modify(|snapshot| {
            let mut next = Vec::with_capacity(snapshot.len() + 1);
            next.push(campaign.clone());
            next.extend(snapshot.iter().map(Arc::clone));
            *snapshot = Arc::new(next);
        });
    }

    // ── Request-state helpers ────────────────────────────────────────

    fn begin_load(&self) {
        self.request.send_modify(|r| {
            r.is_loading = true;
            r.error = None;
        });
    }

    fn finish_load_ok(&self) {
        self.request.send_modify(|r| {
            r.is_loading = false;
            r.last_updated = Some(Utc::now());
        });
    }

    fn finish_load_err(&self, err: &CoreError) {
        self.request.send_modify(|r| {
            r.is_loading = false;
            r.error = Some(err.to_string());
        });
    }

    fn record_error(&self, err: &CoreError) {
        self.request.send_modify(|r| r.error = Some(err.to_string()));
    }

    fn touch(&self) {
        self.request
            .send_modify(|r| r.last_updated = Some(Utc::now()));
    }
}
