//! Per-owner analytics entity.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Aggregated counters for one owner.
///
/// Exactly one record exists per owner that has ever created a link. The
/// record is created lazily by the first delta and updated incrementally.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AnalyticsRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub total_urls: i64,
    pub total_clicks: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AnalyticsRecord {
    /// Average clicks per day since the record was created.
    ///
    /// Informational only; a record younger than a day counts as one day.
    pub fn avg_daily_clicks(&self, now: DateTime<Utc>) -> f64 {
        let days = (now - self.created_at).num_days().max(1);
        self.total_clicks as f64 / days as f64
    }
}

/// Signed change applied to an owner's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsDelta {
    pub urls: i64,
    pub clicks: i64,
}

impl AnalyticsDelta {
    pub const LINK_CREATED: Self = Self { urls: 1, clicks: 0 };
    pub const LINK_DELETED: Self = Self { urls: -1, clicks: 0 };
    pub const CLICK: Self = Self { urls: 0, clicks: 1 };

    pub fn new(urls: i64, clicks: i64) -> Self {
        Self { urls, clicks }
    }
}
