// Wire types for the campaign service REST API.
//
// All payloads use camelCase on the wire. Responses arrive wrapped in a
// `{"data": ...}` envelope; errors in `{"error": {"message", "code"}}`.
// These types stay deliberately loose (Options, flattened extras) --
// `campfly-core` converts them into the strict domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Envelopes ────────────────────────────────────────────────────────

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    pub data: T,
}

/// Error body: `{"error": {"message": "...", "code": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

// ── Campaigns ────────────────────────────────────────────────────────

/// A campaign as the service sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignDto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub flow_id: Option<String>,
    #[serde(default)]
    pub statistics: CampaignStatisticsDto,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,

    /// Fields the service sends that we don't model yet.
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// Aggregate counters the service maintains per campaign.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStatisticsDto {
    #[serde(default)]
    pub total_contacts: u64,
    #[serde(default)]
    pub processed_contacts: u64,
    #[serde(default)]
    pub successful_contacts: u64,
    #[serde(default)]
    pub failed_contacts: u64,
    #[serde(default)]
    pub pending_contacts: u64,
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub average_call_duration: Option<f64>,
    #[serde(default)]
    pub total_call_duration: Option<f64>,
    #[serde(default)]
    pub progress: Option<f64>,
}

/// Body for `POST /api/campaigns`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Body for `PUT /api/campaigns/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// Query parameters for `GET /api/campaigns`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

// ── Contacts ─────────────────────────────────────────────────────────

/// A campaign contact as the service sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDto {
    pub id: String,
    pub campaign_id: String,
    pub phone_number: String,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub debt_amount: Option<f64>,
    pub status: String,
    #[serde(default)]
    pub attempt_count: u32,
    #[serde(default)]
    pub last_attempt_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_attempt_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Value,
}

/// One row of `POST /api/campaigns/{id}/contacts`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub phone_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debt_amount: Option<f64>,
}

/// Body for `PUT /api/campaigns/{id}/contacts/{contactId}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Result of a bulk contact import. The service computes derived
/// campaign counters server-side, so callers refetch after importing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactImportReport {
    #[serde(default)]
    pub added: u64,
    #[serde(default)]
    pub failed: u64,
}
