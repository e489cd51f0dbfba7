// ── API-to-domain type conversions ──
//
// Bridges raw `campfly_api` wire types into canonical `campfly_core::model`
// domain types. Each `From` impl parses strings into strong enums and fills
// sensible defaults for missing optional data; unrecognized wire values
// degrade gracefully instead of failing the whole payload.

use campfly_api::models::{CampaignDto, ContactDto};
use campfly_api::push::PushFrame;

use crate::model::{
    Campaign, CampaignKind, CampaignStatistics, CampaignStatus, Contact, ContactStatus, EntityId,
    PushEvent,
};

// ── Campaign ────────────────────────────────────────────────────────

/// Parse a wire status string; unknown values fall back to `Draft`
/// (the service only sends new statuses alongside new endpoints).
fn parse_status(raw: &str) -> CampaignStatus {
    raw.parse().unwrap_or(CampaignStatus::Draft)
}

impl From<CampaignDto> for Campaign {
    fn from(dto: CampaignDto) -> Self {
        let statistics = CampaignStatistics {
            total_contacts: dto.statistics.total_contacts,
            processed_contacts: dto.statistics.processed_contacts,
            successful_contacts: dto.statistics.successful_contacts,
            failed_contacts: dto.statistics.failed_contacts,
            pending_contacts: dto.statistics.pending_contacts,
            success_rate: dto.statistics.success_rate,
            average_call_secs: dto.statistics.average_call_duration,
            total_call_secs: dto.statistics.total_call_duration,
            progress: dto.statistics.progress,
        };

        Self {
            id: EntityId::from(dto.id),
            name: dto.name,
            description: dto.description,
            status: parse_status(&dto.status),
            kind: dto.kind.as_deref().and_then(|k| k.parse::<CampaignKind>().ok()),
            flow_id: dto.flow_id.map(EntityId::from),
            statistics,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            scheduled_at: dto.scheduled_at,
            started_at: dto.started_at,
            completed_at: dto.completed_at,
        }
    }
}

// ── Contact ─────────────────────────────────────────────────────────

impl From<ContactDto> for Contact {
    fn from(dto: ContactDto) -> Self {
        Self {
            id: EntityId::from(dto.id),
            campaign_id: EntityId::from(dto.campaign_id),
            phone_number: dto.phone_number,
            customer_name: dto.customer_name,
            debt_amount: dto.debt_amount,
            status: dto.status.parse().unwrap_or(ContactStatus::Pending),
            attempt_count: dto.attempt_count,
            last_attempt_at: dto.last_attempt_at,
            next_attempt_at: dto.next_attempt_at,
            notes: dto.notes,
        }
    }
}

// ── Push frames ─────────────────────────────────────────────────────

impl From<PushFrame> for PushEvent {
    fn from(frame: PushFrame) -> Self {
        match frame {
            PushFrame::Status(p) => Self::Status {
                id: EntityId::from(p.campaign_id),
                status: p.status.as_deref().and_then(|s| s.parse().ok()),
                progress: p.progress,
            },
            PushFrame::Updated(p) => Self::Changed {
                id: EntityId::from(p.campaign_id),
                changes: p.changes.unwrap_or(serde_json::Value::Null),
            },
        }
    }
}
