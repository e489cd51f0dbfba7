// ── Gateway and push-channel seams ──
//
// The store talks to the outside world through these two traits only.
// `CampaignGateway` is the REST surface; `PushChannel` is the interest
// registration side of the push transport. Both are object-safe so the
// store can be constructed with test doubles.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{Campaign, Contact, EntityId};

/// A bulk contact import outcome, as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactImportReport {
    pub added: u64,
    pub failed: u64,
}

/// Filters for listing campaigns.
#[derive(Debug, Clone, Default)]
pub struct CampaignQuery {
    pub status: Option<crate::model::CampaignStatus>,
    pub kind: Option<crate::model::CampaignKind>,
    pub search: Option<String>,
}

/// A new campaign draft, as the caller (e.g. a form) assembles it.
#[derive(Debug, Clone, Default)]
pub struct CampaignDraft {
    pub name: String,
    pub description: Option<String>,
    pub kind: Option<crate::model::CampaignKind>,
    pub flow_id: Option<EntityId>,
    pub scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Fields to change on an existing campaign. Unset fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct CampaignChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub flow_id: Option<EntityId>,
    pub scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// A contact row for bulk import.
#[derive(Debug, Clone)]
pub struct ContactDraft {
    pub phone_number: String,
    pub customer_name: Option<String>,
    pub debt_amount: Option<f64>,
}

/// Fields to change on a contact.
#[derive(Debug, Clone, Default)]
pub struct ContactChanges {
    pub status: Option<crate::model::ContactStatus>,
    pub notes: Option<String>,
}

/// Async CRUD + control surface of the campaign service.
///
/// Every mutation returns the authoritative post-mutation entity; GETs
/// are assumed idempotent. The store trusts these responses over any
/// concurrently received push payload.
#[async_trait]
pub trait CampaignGateway: Send + Sync {
    async fn list(&self, query: Option<&CampaignQuery>) -> Result<Vec<Campaign>, CoreError>;
    async fn get(&self, id: &EntityId) -> Result<Campaign, CoreError>;
    async fn create(&self, draft: &CampaignDraft) -> Result<Campaign, CoreError>;
    async fn update(&self, id: &EntityId, changes: &CampaignChanges)
    -> Result<Campaign, CoreError>;
    async fn delete(&self, id: &EntityId) -> Result<(), CoreError>;

    // Control actions
    async fn start(&self, id: &EntityId) -> Result<Campaign, CoreError>;
    async fn pause(&self, id: &EntityId) -> Result<Campaign, CoreError>;
    async fn stop(&self, id: &EntityId) -> Result<Campaign, CoreError>;
    async fn duplicate(&self, id: &EntityId, name: Option<&str>)
    -> Result<Campaign, CoreError>;

    // Contacts (scoped to a parent campaign)
    async fn list_contacts(&self, campaign_id: &EntityId) -> Result<Vec<Contact>, CoreError>;
    async fn add_contacts(
        &self,
        campaign_id: &EntityId,
        rows: &[ContactDraft],
    ) -> Result<ContactImportReport, CoreError>;
    async fn update_contact(
        &self,
        campaign_id: &EntityId,
        contact_id: &EntityId,
        changes: &ContactChanges,
    ) -> Result<Contact, CoreError>;
    async fn remove_contact(
        &self,
        campaign_id: &EntityId,
        contact_id: &EntityId,
    ) -> Result<(), CoreError>;
}

/// Interest registration with the push transport.
///
/// Fire-and-forget by design: registration failures surface as missing
/// real-time updates, never as store errors. Implementations emit the
/// `campaign:subscribe` / `campaign:unsubscribe` topics on the socket.
pub trait PushChannel: Send + Sync {
    fn subscribe_to_campaign(&self, id: &EntityId);
    fn unsubscribe_from_campaign(&self, id: &EntityId);
}
