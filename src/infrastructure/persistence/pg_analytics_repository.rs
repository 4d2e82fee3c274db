//! PostgreSQL implementation of analytics repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{DEFAULT_STORE_TIMEOUT, bounded};
use crate::domain::entities::{AnalyticsDelta, AnalyticsRecord};
use crate::domain::repositories::AnalyticsRepository;
use crate::error::AppError;

/// PostgreSQL repository for per-owner analytics.
///
/// Deltas are applied with `INSERT ... ON CONFLICT (owner_id) DO UPDATE`, so
/// the first event for an owner creates the row and later ones add to it in
/// one statement. `GREATEST(.., 0)` keeps counters non-negative.
pub struct PgAnalyticsRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
}

impl PgAnalyticsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl AnalyticsRepository for PgAnalyticsRepository {
    async fn apply_delta(
        &self,
        owner_id: Uuid,
        delta: AnalyticsDelta,
    ) -> Result<AnalyticsRecord, AppError> {
        bounded(
            self.timeout,
            "analytics.apply_delta",
            sqlx::query_as::<_, AnalyticsRecord>(
                r#"
                INSERT INTO analytics (owner_id, total_urls, total_clicks)
                VALUES ($1, GREATEST($2, 0), GREATEST($3, 0))
                ON CONFLICT (owner_id) DO UPDATE
                SET total_urls = GREATEST(analytics.total_urls + $2, 0),
                    total_clicks = GREATEST(analytics.total_clicks + $3, 0),
                    updated_at = NOW()
                RETURNING id, owner_id, total_urls, total_clicks, created_at, updated_at
                "#,
            )
            .bind(owner_id)
            .bind(delta.urls)
            .bind(delta.clicks)
            .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<AnalyticsRecord>, AppError> {
        bounded(
            self.timeout,
            "analytics.find_by_owner",
            sqlx::query_as::<_, AnalyticsRecord>(
                r#"
                SELECT id, owner_id, total_urls, total_clicks, created_at, updated_at
                FROM analytics
                WHERE owner_id = $1
                "#,
            )
            .bind(owner_id)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }
}
