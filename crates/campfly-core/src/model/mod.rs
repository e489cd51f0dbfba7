// ── Domain model ──

mod campaign;
mod contact;
mod id;
mod push;

pub use campaign::{Campaign, CampaignKind, CampaignStatistics, CampaignStatus};
pub use contact::{Contact, ContactStatus};
pub use id::EntityId;
pub use push::PushEvent;
