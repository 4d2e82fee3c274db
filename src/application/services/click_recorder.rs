//! Click recording for resolved short links.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::application::services::AnalyticsAggregator;
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::error::AppError;

/// Counts clicks on short links and feeds the owner's analytics.
///
/// # Delivery
///
/// [`Self::record_click_async`] runs the increment on its own task so the
/// redirect is answered without waiting for the store. The redirect may
/// therefore be served before the click is committed: if the process dies in
/// between, that single click is lost. This is accepted; click counts are
/// best-effort and failures are only logged.
pub struct ClickRecorder<L, A>
where
    L: LinkRepository + ?Sized,
    A: AnalyticsRepository + ?Sized,
{
    links: Arc<L>,
    analytics: AnalyticsAggregator<A>,
}

impl<L, A> Clone for ClickRecorder<L, A>
where
    L: LinkRepository + ?Sized,
    A: AnalyticsRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            links: Arc::clone(&self.links),
            analytics: self.analytics.clone(),
        }
    }
}

impl<L, A> ClickRecorder<L, A>
where
    L: LinkRepository + ?Sized + 'static,
    A: AnalyticsRepository + ?Sized + 'static,
{
    pub fn new(links: Arc<L>, analytics: AnalyticsAggregator<A>) -> Self {
        Self { links, analytics }
    }

    /// Increments `total_clicks` and `daily_clicks` of `code` and stamps
    /// `last_clicked_at`, in one atomic store update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the code does not exist, or a store
    /// error.
    pub async fn record_click(&self, code: &str) -> Result<(), AppError> {
        self.links.increment_click(code).await
    }

    /// Records a click on a separate task and returns its handle.
    ///
    /// Callers on the request path drop the handle. After a counted click the
    /// owner's `total_clicks` is bumped as well. Both failures are logged and
    /// counted; neither propagates.
    pub fn record_click_async(&self, code: String, owner_id: Uuid) -> JoinHandle<()> {
        let recorder = self.clone();
        tokio::spawn(async move { recorder.record_and_aggregate(&code, owner_id).await })
    }

    async fn record_and_aggregate(&self, code: &str, owner_id: Uuid) {
        if let Err(e) = self.record_click(code).await {
            metrics::counter!("click_record_failures_total").increment(1);
            match e {
                AppError::NotFound { .. } => {
                    warn!(code, "Click dropped: short link no longer exists")
                }
                other => error!(code, error = %other, "Failed to record click"),
            }
            return;
        }

        metrics::counter!("clicks_recorded_total").increment(1);
        debug!(code, "Click recorded");

        if let Err(e) = self.analytics.apply_delta(owner_id, 0, 1).await {
            metrics::counter!("analytics_update_failures_total").increment(1);
            error!(%owner_id, error = %e, "Failed to update owner analytics after click");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AnalyticsDelta, AnalyticsRecord};
    use crate::domain::repositories::{MockAnalyticsRepository, MockLinkRepository};
    use chrono::Utc;
    use serde_json::json;

    fn analytics_record(owner_id: Uuid) -> AnalyticsRecord {
        AnalyticsRecord {
            id: Uuid::new_v4(),
            owner_id,
            total_urls: 1,
            total_clicks: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn recorder(
        links: MockLinkRepository,
        analytics: MockAnalyticsRepository,
    ) -> ClickRecorder<MockLinkRepository, MockAnalyticsRepository> {
        ClickRecorder::new(
            Arc::new(links),
            AnalyticsAggregator::new(Arc::new(analytics)),
        )
    }

    #[tokio::test]
    async fn test_record_click_async_updates_link_and_owner() {
        let owner = Uuid::new_v4();

        let mut links = MockLinkRepository::new();
        links
            .expect_increment_click()
            .withf(|code| code == "aB3xZ")
            .times(1)
            .returning(|_| Ok(()));

        let mut analytics = MockAnalyticsRepository::new();
        analytics
            .expect_apply_delta()
            .withf(move |id, delta| *id == owner && *delta == AnalyticsDelta::CLICK)
            .times(1)
            .returning(|id, _| Ok(analytics_record(id)));

        recorder(links, analytics)
            .record_click_async("aB3xZ".to_string(), owner)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_missing_link_skips_analytics() {
        let mut links = MockLinkRepository::new();
        links
            .expect_increment_click()
            .times(1)
            .returning(|_| Err(AppError::not_found("Short link not found", json!({}))));

        let mut analytics = MockAnalyticsRepository::new();
        analytics.expect_apply_delta().times(0);

        let handle = recorder(links, analytics).record_click_async("gone1".to_string(), Uuid::new_v4());

        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_store_failure_does_not_panic_task() {
        let mut links = MockLinkRepository::new();
        links
            .expect_increment_click()
            .times(1)
            .returning(|_| Err(AppError::unavailable("Store unavailable", json!({}))));

        let mut analytics = MockAnalyticsRepository::new();
        analytics.expect_apply_delta().times(0);

        let handle = recorder(links, analytics).record_click_async("aB3xZ".to_string(), Uuid::new_v4());

        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_analytics_failure_is_swallowed() {
        let mut links = MockLinkRepository::new();
        links.expect_increment_click().times(1).returning(|_| Ok(()));

        let mut analytics = MockAnalyticsRepository::new();
        analytics
            .expect_apply_delta()
            .times(1)
            .returning(|_, _| Err(AppError::internal("Database error", json!({}))));

        let handle = recorder(links, analytics).record_click_async("aB3xZ".to_string(), Uuid::new_v4());

        assert!(handle.await.is_ok());
    }

    #[tokio::test]
    async fn test_record_click_surfaces_not_found() {
        let mut links = MockLinkRepository::new();
        links
            .expect_increment_click()
            .times(1)
            .returning(|_| Err(AppError::not_found("Short link not found", json!({}))));

        let err = recorder(links, MockAnalyticsRepository::new())
            .record_click("nope1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
