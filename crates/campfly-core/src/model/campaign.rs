// ── Campaign domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::id::EntityId;

/// Campaign lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CampaignStatus {
    Draft,
    Scheduled,
    Running,
    Paused,
    Completed,
    Cancelled,
}

/// What a campaign does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CampaignKind {
    DebtCollection,
    PaymentReminder,
    CustomerService,
    Survey,
    Marketing,
}

/// Aggregate counters the service maintains per campaign.
///
/// `progress` is a 0..=100 percentage and is the one field push status
/// ticks update between refetches.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CampaignStatistics {
    pub total_contacts: u64,
    pub processed_contacts: u64,
    pub successful_contacts: u64,
    pub failed_contacts: u64,
    pub pending_contacts: u64,
    pub success_rate: Option<f64>,
    pub average_call_secs: Option<f64>,
    pub total_call_secs: Option<f64>,
    pub progress: Option<f64>,
}

/// The canonical Campaign type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub status: CampaignStatus,
    pub kind: Option<CampaignKind>,
    pub flow_id: Option<EntityId>,
    pub statistics: CampaignStatistics,

    // Lifecycle timestamps
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Campaign {
    /// Shallow-merge a push status tick into this campaign.
    ///
    /// Only the named fields are touched; everything else is preserved,
    /// so the merge is safe to apply while a fuller REST response is in
    /// flight.
    pub fn merged_status(&self, status: Option<CampaignStatus>, progress: Option<f64>) -> Self {
        let mut merged = self.clone();
        if let Some(status) = status {
            merged.status = status;
        }
        if progress.is_some() {
            merged.statistics.progress = progress;
        }
        merged
    }
}
