// ── REST gateway adapter ──
//
// Implements `CampaignGateway` for the concrete `campfly_api` client,
// translating between domain request types and wire DTOs. This is the
// only module that touches both worlds; the store itself never sees a
// DTO or an HTTP status.

use async_trait::async_trait;

use campfly_api::CampaignClient;
use campfly_api::models::{
    CampaignFilters, CampaignPatch, ContactPatch, CreateCampaignRequest, NewContact,
};

use crate::error::CoreError;
use crate::gateway::{
    CampaignChanges, CampaignDraft, CampaignGateway, CampaignQuery, ContactChanges, ContactDraft,
    ContactImportReport,
};
use crate::model::{Campaign, Contact, EntityId};

fn filters_from_query(query: &CampaignQuery) -> CampaignFilters {
    CampaignFilters {
        status: query.status.map(|s| s.to_string()),
        kind: query.kind.map(|k| k.to_string()),
        search: query.search.clone(),
    }
}

fn request_from_draft(draft: &CampaignDraft) -> CreateCampaignRequest {
    CreateCampaignRequest {
        name: draft.name.clone(),
        description: draft.description.clone(),
        kind: draft.kind.map(|k| k.to_string()),
        flow_id: draft.flow_id.as_ref().map(ToString::to_string),
        scheduled_at: draft.scheduled_at,
    }
}

fn patch_from_changes(changes: &CampaignChanges) -> CampaignPatch {
    CampaignPatch {
        name: changes.name.clone(),
        description: changes.description.clone(),
        status: None,
        flow_id: changes.flow_id.as_ref().map(ToString::to_string),
        scheduled_at: changes.scheduled_at,
    }
}

#[async_trait]
impl CampaignGateway for CampaignClient {
    async fn list(&self, query: Option<&CampaignQuery>) -> Result<Vec<Campaign>, CoreError> {
        let filters = query.map(filters_from_query);
        let dtos = self.list_campaigns(filters.as_ref()).await?;
        Ok(dtos.into_iter().map(Campaign::from).collect())
    }

    async fn get(&self, id: &EntityId) -> Result<Campaign, CoreError> {
        Ok(self.get_campaign(&id.to_string()).await?.into())
    }

    async fn create(&self, draft: &CampaignDraft) -> Result<Campaign, CoreError> {
        let req = request_from_draft(draft);
        Ok(self.create_campaign(&req).await?.into())
    }

    async fn update(
        &self,
        id: &EntityId,
        changes: &CampaignChanges,
    ) -> Result<Campaign, CoreError> {
        let patch = patch_from_changes(changes);
        Ok(self.update_campaign(&id.to_string(), &patch).await?.into())
    }

    async fn delete(&self, id: &EntityId) -> Result<(), CoreError> {
        Ok(self.delete_campaign(&id.to_string()).await?)
    }

    async fn start(&self, id: &EntityId) -> Result<Campaign, CoreError> {
        Ok(self.start_campaign(&id.to_string()).await?.into())
    }

    async fn pause(&self, id: &EntityId) -> Result<Campaign, CoreError> {
        Ok(self.pause_campaign(&id.to_string()).await?.into())
    }

    async fn stop(&self, id: &EntityId) -> Result<Campaign, CoreError> {
        Ok(self.stop_campaign(&id.to_string()).await?.into())
    }

    async fn duplicate(
        &self,
        id: &EntityId,
        name: Option<&str>,
    ) -> Result<Campaign, CoreError> {
        Ok(self.duplicate_campaign(&id.to_string(), name).await?.into())
    }

    async fn list_contacts(&self, campaign_id: &EntityId) -> Result<Vec<Contact>, CoreError> {
        let dtos = CampaignClient::list_contacts(self, &campaign_id.to_string()).await?;
        Ok(dtos.into_iter().map(Contact::from).collect())
    }

    async fn add_contacts(
        &self,
        campaign_id: &EntityId,
        rows: &[ContactDraft],
    ) -> Result<ContactImportReport, CoreError> {
        let wire: Vec<NewContact> = rows
            .iter()
            .map(|row| NewContact {
                phone_number: row.phone_number.clone(),
                customer_name: row.customer_name.clone(),
                debt_amount: row.debt_amount,
            })
            .collect();
        let report = CampaignClient::add_contacts(self, &campaign_id.to_string(), &wire).await?;
        Ok(ContactImportReport {
            added: report.added,
            failed: report.failed,
        })
    }

    async fn update_contact(
        &self,
        campaign_id: &EntityId,
        contact_id: &EntityId,
        changes: &ContactChanges,
    ) -> Result<Contact, CoreError> {
        let patch = ContactPatch {
            status: changes.status.map(|s| s.to_string()),
            notes: changes.notes.clone(),
        };
        Ok(CampaignClient::update_contact(
            self,
            &campaign_id.to_string(),
            &contact_id.to_string(),
            &patch,
        )
        .await?
        .into())
    }

    async fn remove_contact(
        &self,
        campaign_id: &EntityId,
        contact_id: &EntityId,
    ) -> Result<(), CoreError> {
        Ok(
            CampaignClient::remove_contact(self, &campaign_id.to_string(), &contact_id.to_string())
                .await?,
        )
    }
}
