//! Per-owner analytics aggregation.

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{AnalyticsDelta, AnalyticsRecord};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// Maintains the single analytics record of each owner.
///
/// All updates are deltas applied by the store in one upsert, so concurrent
/// create and redirect events for the same owner never lose increments and
/// never create a second record.
pub struct AnalyticsAggregator<A: AnalyticsRepository + ?Sized> {
    repository: Arc<A>,
}

impl<A: AnalyticsRepository + ?Sized> Clone for AnalyticsAggregator<A> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<A: AnalyticsRepository + ?Sized> AnalyticsAggregator<A> {
    pub fn new(repository: Arc<A>) -> Self {
        Self { repository }
    }

    /// Adds `url_delta` to `total_urls` and `click_delta` to `total_clicks`.
    ///
    /// Creates the owner's record on first use.
    ///
    /// # Errors
    ///
    /// Propagates store errors unchanged.
    pub async fn apply_delta(
        &self,
        owner_id: Uuid,
        url_delta: i64,
        click_delta: i64,
    ) -> Result<AnalyticsRecord, AppError> {
        self.repository
            .apply_delta(owner_id, AnalyticsDelta::new(url_delta, click_delta))
            .await
    }

    /// Returns the owner's record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the owner never created a link.
    pub async fn get(&self, owner_id: Uuid) -> Result<AnalyticsRecord, AppError> {
        self.repository
            .find_by_owner(owner_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "No analytics recorded for this user",
                    json!({ "user_id": owner_id }),
                )
            })
    }
}
