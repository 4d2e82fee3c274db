//! Repository trait for per-owner analytics.

use crate::domain::entities::{AnalyticsDelta, AnalyticsRecord};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for the one-row-per-owner analytics table.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgAnalyticsRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process store for tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Adds `delta` to the owner's counters, creating the record first if it
    /// does not exist.
    ///
    /// Creation and the first delta are a single atomic step: no reader can
    /// observe a freshly created record with zeroed counters. Counters are
    /// clamped at zero.
    async fn apply_delta(
        &self,
        owner_id: Uuid,
        delta: AnalyticsDelta,
    ) -> Result<AnalyticsRecord, AppError>;

    /// Finds the record for an owner.
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<AnalyticsRecord>, AppError>;
}
