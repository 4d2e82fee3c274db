//! Short link entity representing a code → destination mapping.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// A shortened URL owned by a user.
///
/// `code` is unique across every link in the store. `total_clicks` only ever
/// grows; `daily_clicks` is zeroed by the daily reset job.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ShortLink {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub destination_url: String,
    pub code: String,
    pub total_clicks: i64,
    pub daily_clicks: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ShortLink {
    /// Builds a fresh link with zeroed counters, as the store would return
    /// it right after insertion.
    pub fn new(id: Uuid, owner_id: Uuid, destination_url: String, code: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            owner_id,
            destination_url,
            code,
            total_clicks: 0,
            daily_clicks: 0,
            last_clicked_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, owner_id: Uuid) -> bool {
        self.owner_id == owner_id
    }
}

/// Input data for inserting a new link. The code must already be allocated.
#[derive(Debug, Clone)]
pub struct NewShortLink {
    pub owner_id: Uuid,
    pub destination_url: String,
    pub code: String,
}

/// Partial update for an existing link. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ShortLinkPatch {
    pub destination_url: Option<String>,
    pub code: Option<String>,
}

impl ShortLinkPatch {
    pub fn is_empty(&self) -> bool {
        self.destination_url.is_none() && self.code.is_none()
    }
}

/// Store-wide counters, used by the health check and the admin CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTotals {
    pub links: i64,
    pub total_clicks: i64,
    pub daily_clicks: i64,
}
