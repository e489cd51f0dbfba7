// ── Campaign contact domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::id::EntityId;

/// Per-contact dial state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ContactStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Skipped,
}

/// A contact enrolled in a campaign.
///
/// Contacts are scoped to their parent campaign; the store never mixes
/// contact lists across campaigns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: EntityId,
    pub campaign_id: EntityId,
    pub phone_number: String,
    pub customer_name: Option<String>,
    pub debt_amount: Option<f64>,
    pub status: ContactStatus,
    pub attempt_count: u32,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub next_attempt_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}
