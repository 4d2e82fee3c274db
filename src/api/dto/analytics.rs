//! DTOs for click analytics and code resolution.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::domain::entities::{AnalyticsRecord, ShortLink};

/// Click counters of a single link.
#[derive(Debug, Serialize)]
pub struct LinkAnalyticsResponse {
    pub id: Uuid,
    pub code: String,
    pub total_clicks: i64,
    pub daily_clicks: i64,
    pub last_clicked_at: Option<DateTime<Utc>>,
}

impl From<ShortLink> for LinkAnalyticsResponse {
    fn from(link: ShortLink) -> Self {
        Self {
            id: link.id,
            code: link.code,
            total_clicks: link.total_clicks,
            daily_clicks: link.daily_clicks,
            last_clicked_at: link.last_clicked_at,
        }
    }
}

/// Aggregated counters of one owner.
#[derive(Debug, Serialize)]
pub struct OwnerAnalyticsResponse {
    pub user_id: Uuid,
    pub total_urls: i64,
    pub total_clicks: i64,
    pub avg_daily_clicks: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnerAnalyticsResponse {
    pub fn new(record: AnalyticsRecord, now: DateTime<Utc>) -> Self {
        Self {
            avg_daily_clicks: record.avg_daily_clicks(now),
            user_id: record.owner_id,
            total_urls: record.total_urls,
            total_clicks: record.total_clicks,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Destination of a resolved code.
#[derive(Debug, Serialize)]
pub struct ResolveResponse {
    pub original_url: String,
}
