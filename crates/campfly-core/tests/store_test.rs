//! Integration tests for `CampaignStore` against scripted gateway and
//! push-channel doubles. Each test drives the store through its public
//! API only, the way a UI layer would.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;

use campfly_core::{
    Campaign, CampaignChanges, CampaignDraft, CampaignGateway, CampaignQuery, CampaignStatistics,
    CampaignStatus, CampaignStore, Contact, ContactChanges, ContactDraft, ContactImportReport,
    ContactStatus, CoreError, EntityId, PushChannel, PushEvent,
};

// ── Test doubles ────────────────────────────────────────────────────

type Script<T> = Mutex<VecDeque<Result<T, CoreError>>>;

/// Gateway double with per-method response queues. Unscripted calls
/// fail loudly so a test can't silently exercise the wrong path.
#[derive(Default)]
struct ScriptedGateway {
    list: Script<Vec<Campaign>>,
    get: Script<Campaign>,
    create: Script<Campaign>,
    update: Script<Campaign>,
    delete: Script<()>,
    control: Script<Campaign>,
    duplicate: Script<Campaign>,
    list_contacts: Script<Vec<Contact>>,
    add_contacts: Script<ContactImportReport>,
    update_contact: Script<Contact>,
    remove_contact: Script<()>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedGateway {
    fn push<T>(queue: &Script<T>, result: Result<T, CoreError>) {
        queue.lock().unwrap().push_back(result);
    }

    fn take<T>(&self, method: &str, queue: &Script<T>) -> Result<T, CoreError> {
        self.calls.lock().unwrap().push(method.to_owned());
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(CoreError::Internal(format!("unscripted call: {method}"))))
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CampaignGateway for ScriptedGateway {
    async fn list(&self, _query: Option<&CampaignQuery>) -> Result<Vec<Campaign>, CoreError> {
        self.take("list", &self.list)
    }

    async fn get(&self, _id: &EntityId) -> Result<Campaign, CoreError> {
        self.take("get", &self.get)
    }

    async fn create(&self, _draft: &CampaignDraft) -> Result<Campaign, CoreError> {
        self.take("create", &self.create)
    }

    async fn update(
        &self,
        _id: &EntityId,
        _changes: &CampaignChanges,
    ) -> Result<Campaign, CoreError> {
        self.take("update", &self.update)
    }

    async fn delete(&self, _id: &EntityId) -> Result<(), CoreError> {
        self.take("delete", &self.delete)
    }

    async fn start(&self, _id: &EntityId) -> Result<Campaign, CoreError> {
        self.take("start", &self.control)
    }

    async fn pause(&self, _id: &EntityId) -> Result<Campaign, CoreError> {
        self.take("pause", &self.control)
    }

    async fn stop(&self, _id: &EntityId) -> Result<Campaign, CoreError> {
        self.take("stop", &self.control)
    }

    async fn duplicate(&self, _id: &EntityId, _name: Option<&str>) -> Result<Campaign, CoreError> {
        self.take("duplicate", &self.duplicate)
    }

    async fn list_contacts(&self, _campaign_id: &EntityId) -> Result<Vec<Contact>, CoreError> {
        self.take("list_contacts", &self.list_contacts)
    }

    async fn add_contacts(
        &self,
        _campaign_id: &EntityId,
        _rows: &[ContactDraft],
    ) -> Result<ContactImportReport, CoreError> {
        self.take("add_contacts", &self.add_contacts)
    }

    async fn update_contact(
        &self,
        _campaign_id: &EntityId,
        _contact_id: &EntityId,
        _changes: &ContactChanges,
    ) -> Result<Contact, CoreError> {
        self.take("update_contact", &self.update_contact)
    }

    async fn remove_contact(
        &self,
        _campaign_id: &EntityId,
        _contact_id: &EntityId,
    ) -> Result<(), CoreError> {
        self.take("remove_contact", &self.remove_contact)
    }
}

/// Push channel double recording every registration call in order.
#[derive(Default)]
struct RecordingChannel {
    events: Mutex<Vec<String>>,
}

impl RecordingChannel {
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl PushChannel for RecordingChannel {
    fn subscribe_to_campaign(&self, id: &EntityId) {
        self.events.lock().unwrap().push(format!("sub:{id}"));
    }

    fn unsubscribe_from_campaign(&self, id: &EntityId) {
        self.events.lock().unwrap().push(format!("unsub:{id}"));
    }
}

// ── Fixtures ────────────────────────────────────────────────────────

fn campaign(id: &str, name: &str, status: CampaignStatus, progress: Option<f64>) -> Campaign {
    Campaign {
        id: EntityId::from(id),
        name: name.to_owned(),
        description: None,
        status,
        kind: None,
        flow_id: None,
        statistics: CampaignStatistics {
            total_contacts: 50,
            progress,
            ..CampaignStatistics::default()
        },
        created_at: None,
        updated_at: None,
        scheduled_at: None,
        started_at: None,
        completed_at: None,
    }
}

fn contact(id: &str, campaign_id: &str) -> Contact {
    Contact {
        id: EntityId::from(id),
        campaign_id: EntityId::from(campaign_id),
        phone_number: "+4712345678".to_owned(),
        customer_name: Some("Kari Nordmann".to_owned()),
        debt_amount: Some(1250.0),
        status: ContactStatus::Pending,
        attempt_count: 0,
        last_attempt_at: None,
        next_attempt_at: None,
        notes: None,
    }
}

fn setup() -> (Arc<ScriptedGateway>, Arc<RecordingChannel>, CampaignStore) {
    let gateway = Arc::new(ScriptedGateway::default());
    let channel = Arc::new(RecordingChannel::default());
    let store = CampaignStore::new(
        Arc::clone(&gateway) as Arc<dyn CampaignGateway>,
        Arc::clone(&channel) as Arc<dyn PushChannel>,
    );
    (gateway, channel, store)
}

fn ids(store: &CampaignStore) -> Vec<String> {
    store
        .campaigns_snapshot()
        .iter()
        .map(|c| c.id.to_string())
        .collect()
}

/// Seed the collection with the given campaigns via a scripted fetch.
async fn seed(gateway: &ScriptedGateway, store: &CampaignStore, campaigns: Vec<Campaign>) {
    ScriptedGateway::push(&gateway.list, Ok(campaigns));
    store.fetch_campaigns(None).await;
    assert_eq!(store.error(), None);
}

// ── Collection fetch ────────────────────────────────────────────────

#[tokio::test]
async fn fetch_campaigns_replaces_collection_in_order() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![
            campaign("c1", "one", CampaignStatus::Running, Some(10.0)),
            campaign("c2", "two", CampaignStatus::Draft, None),
        ],
    )
    .await;

    assert_eq!(ids(&store), ["c1", "c2"]);
    assert!(!store.is_loading());
    assert!(store.last_updated().is_some());

    // A later fetch with different contents replaces wholesale.
    ScriptedGateway::push(
        &gateway.list,
        Ok(vec![campaign("c3", "three", CampaignStatus::Draft, None)]),
    );
    store.fetch_campaigns(None).await;
    assert_eq!(ids(&store), ["c3"]);
}

#[tokio::test]
async fn fetch_campaigns_failure_keeps_previous_collection() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;

    ScriptedGateway::push(
        &gateway.list,
        Err(CoreError::ConnectionFailed {
            reason: "socket closed".to_owned(),
        }),
    );
    store.fetch_campaigns(None).await;

    assert_eq!(ids(&store), ["c1"]);
    assert!(!store.is_loading());
    assert!(store.error().is_some());
}

// ── Single fetch + focus ────────────────────────────────────────────

#[tokio::test]
async fn fetch_campaign_replaces_in_place_and_focuses() {
    let (gateway, channel, store) = setup();
    seed(
        &gateway,
        &store,
        vec![
            campaign("c1", "one", CampaignStatus::Running, Some(10.0)),
            campaign("c2", "two", CampaignStatus::Draft, None),
        ],
    )
    .await;

    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c2", "two (renamed)", CampaignStatus::Scheduled, None)),
    );
    store.fetch_campaign(&EntityId::from("c2")).await;

    // Replaced at its old position, not appended.
    assert_eq!(ids(&store), ["c1", "c2"]);
    let c2 = store.campaign_by_id(&EntityId::from("c2")).unwrap();
    assert_eq!(c2.name, "two (renamed)");
    assert_eq!(c2.status, CampaignStatus::Scheduled);

    let focused = store.focused().unwrap();
    assert_eq!(focused.id, EntityId::from("c2"));
    assert_eq!(channel.events(), ["sub:c2"]);
}

#[tokio::test]
async fn repeated_fetch_campaign_with_unchanged_backend_is_idempotent() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![
            campaign("c1", "one", CampaignStatus::Running, Some(10.0)),
            campaign("c2", "two", CampaignStatus::Draft, None),
        ],
    )
    .await;

    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c1", "one", CampaignStatus::Running, Some(10.0))),
    );
    store.fetch_campaign(&EntityId::from("c1")).await;
    let first_collection = store.campaigns_snapshot();
    let first_focus = store.focused();

    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c1", "one", CampaignStatus::Running, Some(10.0))),
    );
    store.fetch_campaign(&EntityId::from("c1")).await;

    assert_eq!(*store.campaigns_snapshot(), *first_collection);
    assert_eq!(store.focused(), first_focus);
}

#[tokio::test]
async fn fetch_campaign_outside_collection_focuses_without_appending() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;

    // Deep link: the detail view loads an id the list never contained.
    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c9", "direct", CampaignStatus::Paused, None)),
    );
    store.fetch_campaign(&EntityId::from("c9")).await;

    assert_eq!(ids(&store), ["c1"]);
    assert_eq!(store.focused().unwrap().id, EntityId::from("c9"));
}

#[tokio::test]
async fn fetch_campaign_failure_keeps_prior_focus() {
    let (gateway, _, store) = setup();
    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c1", "one", CampaignStatus::Running, None)),
    );
    store.fetch_campaign(&EntityId::from("c1")).await;

    ScriptedGateway::push(
        &gateway.get,
        Err(CoreError::CampaignNotFound {
            identifier: "c2".to_owned(),
        }),
    );
    store.fetch_campaign(&EntityId::from("c2")).await;

    assert_eq!(store.focused().unwrap().id, EntityId::from("c1"));
    assert!(store.error().is_some());
}

#[tokio::test]
async fn no_duplicate_ids_across_fetch_one_and_create() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![
            campaign("c1", "one", CampaignStatus::Running, None),
            campaign("c2", "two", CampaignStatus::Draft, None),
        ],
    )
    .await;

    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c1", "one again", CampaignStatus::Running, None)),
    );
    store.fetch_campaign(&EntityId::from("c1")).await;

    ScriptedGateway::push(
        &gateway.create,
        Ok(campaign("c3", "three", CampaignStatus::Draft, None)),
    );
    store
        .create_campaign(&CampaignDraft {
            name: "three".to_owned(),
            ..CampaignDraft::default()
        })
        .await
        .unwrap();

    let mut seen = ids(&store);
    assert_eq!(seen, ["c3", "c1", "c2"]);
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 3);
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn create_prepends_and_clears_request_state() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;

    ScriptedGateway::push(
        &gateway.create,
        Ok(campaign("c2", "fresh", CampaignStatus::Draft, None)),
    );
    let created = store
        .create_campaign(&CampaignDraft {
            name: "fresh".to_owned(),
            ..CampaignDraft::default()
        })
        .await
        .unwrap();

    assert_eq!(created.id, EntityId::from("c2"));
    assert_eq!(ids(&store), ["c2", "c1"]);
    assert!(!store.is_loading());
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn update_failure_leaves_entry_untouched_and_returns_err() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, Some(10.0))],
    )
    .await;

    ScriptedGateway::push(
        &gateway.update,
        Err(CoreError::ValidationFailed {
            message: "name must not be empty".to_owned(),
        }),
    );
    let result = store
        .update_campaign(
            &EntityId::from("c1"),
            &CampaignChanges {
                name: Some(String::new()),
                ..CampaignChanges::default()
            },
        )
        .await;

    assert!(matches!(result, Err(CoreError::ValidationFailed { .. })));
    let entry = store.campaign_by_id(&EntityId::from("c1")).unwrap();
    assert_eq!(entry.name, "one");
    assert_eq!(entry.statistics.progress, Some(10.0));
    assert!(store.error().unwrap().contains("name must not be empty"));
}

#[tokio::test]
async fn update_success_syncs_collection_and_focused() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;
    store.select_campaign(Some(campaign("c1", "one", CampaignStatus::Running, None)));

    ScriptedGateway::push(
        &gateway.update,
        Ok(campaign("c1", "renamed", CampaignStatus::Running, None)),
    );
    store
        .update_campaign(
            &EntityId::from("c1"),
            &CampaignChanges {
                name: Some("renamed".to_owned()),
                ..CampaignChanges::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(store.campaign_by_id(&EntityId::from("c1")).unwrap().name, "renamed");
    assert_eq!(store.focused().unwrap().name, "renamed");
}

#[tokio::test]
async fn delete_focused_clears_focus_contacts_and_subscription() {
    let (gateway, channel, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;

    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c1", "one", CampaignStatus::Running, None)),
    );
    store.fetch_campaign(&EntityId::from("c1")).await;

    ScriptedGateway::push(&gateway.list_contacts, Ok(vec![contact("p1", "c1")]));
    store.fetch_contacts(&EntityId::from("c1")).await;
    assert_eq!(store.contacts_snapshot().len(), 1);

    ScriptedGateway::push(&gateway.delete, Ok(()));
    store.delete_campaign(&EntityId::from("c1")).await.unwrap();

    assert!(ids(&store).is_empty());
    assert_eq!(store.focused(), None);
    assert!(store.contacts_snapshot().is_empty());
    assert_eq!(channel.events(), ["sub:c1", "unsub:c1"]);
}

#[tokio::test]
async fn delete_unfocused_keeps_focus_and_contacts() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![
            campaign("c1", "one", CampaignStatus::Running, None),
            campaign("c2", "two", CampaignStatus::Draft, None),
        ],
    )
    .await;
    store.select_campaign(Some(campaign("c1", "one", CampaignStatus::Running, None)));

    ScriptedGateway::push(&gateway.delete, Ok(()));
    store.delete_campaign(&EntityId::from("c2")).await.unwrap();

    assert_eq!(ids(&store), ["c1"]);
    assert_eq!(store.focused().unwrap().id, EntityId::from("c1"));
}

// ── Control actions ─────────────────────────────────────────────────

#[tokio::test]
async fn start_success_replaces_entry_and_focused() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Draft, None)],
    )
    .await;
    store.select_campaign(Some(campaign("c1", "one", CampaignStatus::Draft, None)));

    ScriptedGateway::push(
        &gateway.control,
        Ok(campaign("c1", "one", CampaignStatus::Running, Some(0.0))),
    );
    let started = store.start_campaign(&EntityId::from("c1")).await.unwrap();

    assert_eq!(started.status, CampaignStatus::Running);
    assert_eq!(
        store.campaign_by_id(&EntityId::from("c1")).unwrap().status,
        CampaignStatus::Running
    );
    assert_eq!(store.focused().unwrap().status, CampaignStatus::Running);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn control_failure_records_error_and_keeps_cache() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Completed, Some(100.0))],
    )
    .await;

    ScriptedGateway::push(
        &gateway.control,
        Err(CoreError::Rejected {
            message: "campaign already completed".to_owned(),
        }),
    );
    let result = store.start_campaign(&EntityId::from("c1")).await;

    assert!(matches!(result, Err(CoreError::Rejected { .. })));
    assert_eq!(
        store.campaign_by_id(&EntityId::from("c1")).unwrap().status,
        CampaignStatus::Completed
    );
    assert!(store.error().unwrap().contains("already completed"));
    // Control actions never touch the loading flag.
    assert!(!store.is_loading());
}

#[tokio::test]
async fn duplicate_prepends_copy() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Completed, Some(100.0))],
    )
    .await;

    ScriptedGateway::push(
        &gateway.duplicate,
        Ok(campaign("c7", "one (copy)", CampaignStatus::Draft, None)),
    );
    let copy = store
        .duplicate_campaign(&EntityId::from("c1"), Some("one (copy)"))
        .await
        .unwrap();

    assert_eq!(copy.name, "one (copy)");
    assert_eq!(ids(&store), ["c7", "c1"]);
}

// ── Contacts ────────────────────────────────────────────────────────

#[tokio::test]
async fn fetch_contacts_failure_keeps_previous_list() {
    let (gateway, _, store) = setup();
    ScriptedGateway::push(&gateway.list_contacts, Ok(vec![contact("p1", "c1")]));
    store.fetch_contacts(&EntityId::from("c1")).await;

    ScriptedGateway::push(
        &gateway.list_contacts,
        Err(CoreError::Timeout { timeout_secs: 30 }),
    );
    store.fetch_contacts(&EntityId::from("c1")).await;

    assert_eq!(store.contacts_snapshot().len(), 1);
    assert!(store.error().is_some());
}

#[tokio::test]
async fn add_contacts_returns_report_and_refetches() {
    let (gateway, _, store) = setup();
    ScriptedGateway::push(
        &gateway.add_contacts,
        Ok(ContactImportReport { added: 2, failed: 1 }),
    );
    ScriptedGateway::push(
        &gateway.list_contacts,
        Ok(vec![contact("p1", "c1"), contact("p2", "c1")]),
    );

    let rows = vec![
        ContactDraft {
            phone_number: "+4712345678".to_owned(),
            customer_name: None,
            debt_amount: None,
        },
        ContactDraft {
            phone_number: "+4787654321".to_owned(),
            customer_name: None,
            debt_amount: None,
        },
        ContactDraft {
            phone_number: "not-a-number".to_owned(),
            customer_name: None,
            debt_amount: None,
        },
    ];
    let report = store
        .add_contacts(&EntityId::from("c1"), &rows)
        .await
        .unwrap();

    assert_eq!(report, ContactImportReport { added: 2, failed: 1 });
    assert_eq!(store.contacts_snapshot().len(), 2);
    assert_eq!(gateway.calls(), ["add_contacts", "list_contacts"]);
}

#[tokio::test]
async fn update_contact_replaces_in_place() {
    let (gateway, _, store) = setup();
    ScriptedGateway::push(
        &gateway.list_contacts,
        Ok(vec![contact("p1", "c1"), contact("p2", "c1")]),
    );
    store.fetch_contacts(&EntityId::from("c1")).await;

    let mut done = contact("p2", "c1");
    done.status = ContactStatus::Completed;
    ScriptedGateway::push(&gateway.update_contact, Ok(done));

    let updated = store
        .update_contact(
            &EntityId::from("c1"),
            &EntityId::from("p2"),
            &ContactChanges {
                status: Some(ContactStatus::Completed),
                notes: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, ContactStatus::Completed);
    let snapshot = store.contacts_snapshot();
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot[1].status, ContactStatus::Completed);
    assert_eq!(snapshot[0].status, ContactStatus::Pending);
}

#[tokio::test]
async fn remove_contact_drops_entry() {
    let (gateway, _, store) = setup();
    ScriptedGateway::push(
        &gateway.list_contacts,
        Ok(vec![contact("p1", "c1"), contact("p2", "c1")]),
    );
    store.fetch_contacts(&EntityId::from("c1")).await;

    ScriptedGateway::push(&gateway.remove_contact, Ok(()));
    store
        .remove_contact(&EntityId::from("c1"), &EntityId::from("p1"))
        .await
        .unwrap();

    let snapshot = store.contacts_snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, EntityId::from("p2"));
}

// ── Push events ─────────────────────────────────────────────────────

#[tokio::test]
async fn push_status_merges_into_collection_and_focused_without_rest() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, Some(60.0))],
    )
    .await;
    store.select_campaign(Some(campaign("c1", "one", CampaignStatus::Running, Some(60.0))));
    let calls_before = gateway.calls().len();

    store
        .on_push_event(PushEvent::Status {
            id: EntityId::from("c1"),
            status: Some(CampaignStatus::Completed),
            progress: Some(100.0),
        })
        .await;

    let entry = store.campaign_by_id(&EntityId::from("c1")).unwrap();
    assert_eq!(entry.status, CampaignStatus::Completed);
    assert_eq!(entry.statistics.progress, Some(100.0));
    assert_eq!(entry.name, "one");
    assert_eq!(entry.statistics.total_contacts, 50);

    let focused = store.focused().unwrap();
    assert_eq!(focused.status, CampaignStatus::Completed);
    assert_eq!(focused.statistics.progress, Some(100.0));

    // No REST traffic for a status tick.
    assert_eq!(gateway.calls().len(), calls_before);
}

#[tokio::test]
async fn push_status_with_progress_only_keeps_status() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, Some(10.0))],
    )
    .await;

    store
        .on_push_event(PushEvent::Status {
            id: EntityId::from("c1"),
            status: None,
            progress: Some(40.0),
        })
        .await;

    let entry = store.campaign_by_id(&EntityId::from("c1")).unwrap();
    assert_eq!(entry.status, CampaignStatus::Running);
    assert_eq!(entry.statistics.progress, Some(40.0));
}

#[tokio::test]
async fn push_status_for_unknown_id_is_ignored() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, Some(10.0))],
    )
    .await;
    let before = store.campaigns_snapshot();

    store
        .on_push_event(PushEvent::Status {
            id: EntityId::from("ghost"),
            status: Some(CampaignStatus::Completed),
            progress: None,
        })
        .await;

    assert_eq!(*store.campaigns_snapshot(), *before);
    assert_eq!(store.focused(), None);
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn push_changed_refetches_authoritative_record() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, Some(10.0))],
    )
    .await;

    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c1", "one (edited elsewhere)", CampaignStatus::Paused, Some(10.0))),
    );
    store
        .on_push_event(PushEvent::Changed {
            id: EntityId::from("c1"),
            changes: json!({"name": "stale advisory payload"}),
        })
        .await;

    let entry = store.campaign_by_id(&EntityId::from("c1")).unwrap();
    // The refetched record wins; the advisory payload is never applied.
    assert_eq!(entry.name, "one (edited elsewhere)");
    assert_eq!(entry.status, CampaignStatus::Paused);
    assert_eq!(gateway.calls().last().map(String::as_str), Some("get"));
}

#[tokio::test]
async fn push_changed_refetch_failure_is_warn_only() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, Some(10.0))],
    )
    .await;

    ScriptedGateway::push(
        &gateway.get,
        Err(CoreError::ConnectionFailed {
            reason: "socket closed".to_owned(),
        }),
    );
    store
        .on_push_event(PushEvent::Changed {
            id: EntityId::from("c1"),
            changes: json!({}),
        })
        .await;

    // Background reconciliation failures never surface as store errors.
    assert_eq!(store.error(), None);
    assert!(!store.is_loading());
    assert_eq!(store.campaign_by_id(&EntityId::from("c1")).unwrap().name, "one");
}

// ── Subscription bookkeeping ────────────────────────────────────────

#[tokio::test]
async fn focus_changes_swap_push_subscription() {
    let (gateway, channel, store) = setup();

    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c1", "one", CampaignStatus::Running, None)),
    );
    store.fetch_campaign(&EntityId::from("c1")).await;

    // Refocusing the same id is a no-op for the channel.
    store.select_campaign(Some(campaign("c1", "one", CampaignStatus::Running, None)));

    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c2", "two", CampaignStatus::Draft, None)),
    );
    store.fetch_campaign(&EntityId::from("c2")).await;

    // Clearing focus leaves the subscription in place.
    store.select_campaign(None);

    assert_eq!(channel.events(), ["sub:c1", "unsub:c1", "sub:c2"]);
}

// ── Error handling and lifecycle ────────────────────────────────────

#[tokio::test]
async fn clear_error_only_clears_error() {
    let (gateway, _, store) = setup();
    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;

    ScriptedGateway::push(
        &gateway.list,
        Err(CoreError::Timeout { timeout_secs: 30 }),
    );
    store.fetch_campaigns(None).await;
    assert!(store.error().is_some());

    store.clear_error();

    assert_eq!(store.error(), None);
    assert_eq!(ids(&store), ["c1"]);
}

#[tokio::test]
async fn next_tracked_operation_clears_stale_error() {
    let (gateway, _, store) = setup();
    ScriptedGateway::push(
        &gateway.list,
        Err(CoreError::Timeout { timeout_secs: 30 }),
    );
    store.fetch_campaigns(None).await;
    assert!(store.error().is_some());

    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;
    assert_eq!(store.error(), None);
}

#[tokio::test]
async fn reset_restores_initial_state_and_drops_subscription() {
    let (gateway, channel, store) = setup();
    ScriptedGateway::push(
        &gateway.get,
        Ok(campaign("c1", "one", CampaignStatus::Running, None)),
    );
    store.fetch_campaign(&EntityId::from("c1")).await;
    ScriptedGateway::push(&gateway.list_contacts, Ok(vec![contact("p1", "c1")]));
    store.fetch_contacts(&EntityId::from("c1")).await;

    store.reset();

    assert!(store.campaigns_snapshot().is_empty());
    assert_eq!(store.focused(), None);
    assert!(store.contacts_snapshot().is_empty());
    assert!(!store.is_loading());
    assert_eq!(store.error(), None);
    assert_eq!(store.last_updated(), None);
    assert_eq!(channel.events(), ["sub:c1", "unsub:c1"]);
}

// ── Reactive streams ────────────────────────────────────────────────

#[tokio::test]
async fn subscription_streams_observe_mutations() {
    let (gateway, _, store) = setup();
    let mut stream = store.subscribe_campaigns();
    assert!(stream.snapshot().is_empty());

    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;

    let snapshot = stream.changed().await.unwrap();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot[0].id, EntityId::from("c1"));
    assert_eq!(stream.snapshot().len(), 1);
}

#[tokio::test]
async fn focus_stream_observes_selection_and_clearing() {
    let (_, _, store) = setup();
    let mut focus = store.subscribe_focused();
    assert!(focus.current().is_none());

    store.select_campaign(Some(campaign("c1", "one", CampaignStatus::Running, None)));
    let focused = focus.changed().await.unwrap();
    assert_eq!(focused.unwrap().id, EntityId::from("c1"));

    store.select_campaign(None);
    let cleared = focus.changed().await.unwrap();
    assert!(cleared.is_none());
}

#[tokio::test]
async fn into_stream_yields_snapshots_per_mutation() {
    use futures_util::StreamExt;

    let (gateway, _, store) = setup();
    let mut stream = store.subscribe_campaigns().into_stream();

    // WatchStream yields the current value first.
    let initial = stream.next().await.unwrap();
    assert!(initial.is_empty());

    seed(
        &gateway,
        &store,
        vec![campaign("c1", "one", CampaignStatus::Running, None)],
    )
    .await;

    let snapshot = stream.next().await.unwrap();
    assert_eq!(snapshot.len(), 1);
}

#[tokio::test]
async fn request_state_watcher_sees_error_transitions() {
    let (gateway, _, store) = setup();
    let request = store.subscribe_request_state();

    ScriptedGateway::push(
        &gateway.list,
        Err(CoreError::ConnectionFailed {
            reason: "refused".to_owned(),
        }),
    );
    store.fetch_campaigns(None).await;

    let state = request.borrow().clone();
    assert!(!state.is_loading);
    assert!(state.error.is_some());
}
