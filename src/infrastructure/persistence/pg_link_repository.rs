//! PostgreSQL implementation of link repository.

use async_trait::async_trait;
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::{DEFAULT_RESET_TIMEOUT, DEFAULT_STORE_TIMEOUT, bounded};
use crate::domain::entities::{LinkTotals, NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;

/// PostgreSQL repository for short links.
///
/// Click counters are updated with single-statement `UPDATE`s, so concurrent
/// redirects never lose increments. The `links_code_key` constraint rejects
/// duplicate codes, which [`AppError`]'s `sqlx` conversion reports as a
/// conflict.
///
/// Point operations are bounded by `timeout`. The bulk daily reset updates
/// every row and is bounded by `reset_timeout` instead.
pub struct PgLinkRepository {
    pool: Arc<PgPool>,
    timeout: Duration,
    reset_timeout: Duration,
}

impl PgLinkRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self {
            pool,
            timeout: DEFAULT_STORE_TIMEOUT,
            reset_timeout: DEFAULT_RESET_TIMEOUT,
        }
    }

    /// Overrides the per-operation timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Overrides the bound on [`LinkRepository::reset_all_daily_clicks`].
    pub fn with_reset_timeout(mut self, reset_timeout: Duration) -> Self {
        self.reset_timeout = reset_timeout;
        self
    }
}

#[async_trait]
impl LinkRepository for PgLinkRepository {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        bounded(
            self.timeout,
            "links.exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM links WHERE code = $1)")
                .bind(code)
                .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        bounded(
            self.timeout,
            "links.insert",
            sqlx::query_as::<_, ShortLink>(
                r#"
                INSERT INTO links (owner_id, destination_url, code)
                VALUES ($1, $2, $3)
                RETURNING id, owner_id, destination_url, code, total_clicks, daily_clicks,
                          last_clicked_at, created_at, updated_at
                "#,
            )
            .bind(new_link.owner_id)
            .bind(&new_link.destination_url)
            .bind(&new_link.code)
            .fetch_one(self.pool.as_ref()),
        )
        .await
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        bounded(
            self.timeout,
            "links.find_by_code",
            sqlx::query_as::<_, ShortLink>(
                r#"
                SELECT id, owner_id, destination_url, code, total_clicks, daily_clicks,
                       last_clicked_at, created_at, updated_at
                FROM links
                WHERE code = $1
                "#,
            )
            .bind(code)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        bounded(
            self.timeout,
            "links.find_by_id",
            sqlx::query_as::<_, ShortLink>(
                r#"
                SELECT id, owner_id, destination_url, code, total_clicks, daily_clicks,
                       last_clicked_at, created_at, updated_at
                FROM links
                WHERE id = $1
                "#,
            )
            .bind(id)
            .fetch_optional(self.pool.as_ref()),
        )
        .await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ShortLink>, AppError> {
        bounded(
            self.timeout,
            "links.list_by_owner",
            sqlx::query_as::<_, ShortLink>(
                r#"
                SELECT id, owner_id, destination_url, code, total_clicks, daily_clicks,
                       last_clicked_at, created_at, updated_at
                FROM links
                WHERE owner_id = $1
                ORDER BY created_at DESC, id
                "#,
            )
            .bind(owner_id)
            .fetch_all(self.pool.as_ref()),
        )
        .await
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ShortLinkPatch,
    ) -> Result<ShortLink, AppError> {
        let updated = bounded(
            self.timeout,
            "links.update",
            sqlx::query_as::<_, ShortLink>(
                r#"
                UPDATE links
                SET destination_url = COALESCE($3, destination_url),
                    code = COALESCE($4, code),
                    updated_at = NOW()
                WHERE id = $1 AND owner_id = $2
                RETURNING id, owner_id, destination_url, code, total_clicks, daily_clicks,
                          last_clicked_at, created_at, updated_at
                "#,
            )
            .bind(id)
            .bind(owner_id)
            .bind(patch.destination_url)
            .bind(patch.code)
            .fetch_optional(self.pool.as_ref()),
        )
        .await?;

        updated.ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, AppError> {
        let result = bounded(
            self.timeout,
            "links.delete",
            sqlx::query("DELETE FROM links WHERE id = $1 AND owner_id = $2")
                .bind(id)
                .bind(owner_id)
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn increment_click(&self, code: &str) -> Result<(), AppError> {
        let result = bounded(
            self.timeout,
            "links.increment_click",
            sqlx::query(
                r#"
                UPDATE links
                SET total_clicks = total_clicks + 1,
                    daily_clicks = daily_clicks + 1,
                    last_clicked_at = NOW()
                WHERE code = $1
                "#,
            )
            .bind(code)
            .execute(self.pool.as_ref()),
        )
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "code": code }),
            ));
        }
        Ok(())
    }

    async fn reset_all_daily_clicks(&self) -> Result<u64, AppError> {
        let result = bounded(
            self.reset_timeout,
            "links.reset_all_daily_clicks",
            sqlx::query("UPDATE links SET daily_clicks = 0 WHERE daily_clicks <> 0")
                .execute(self.pool.as_ref()),
        )
        .await?;

        Ok(result.rows_affected())
    }

    async fn totals(&self) -> Result<LinkTotals, AppError> {
        let (links, total_clicks, daily_clicks) = bounded(
            self.timeout,
            "links.totals",
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT COUNT(*),
                       COALESCE(SUM(total_clicks), 0)::BIGINT,
                       COALESCE(SUM(daily_clicks), 0)::BIGINT
                FROM links
                "#,
            )
            .fetch_one(self.pool.as_ref()),
        )
        .await?;

        Ok(LinkTotals {
            links,
            total_clicks,
            daily_clicks,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Instant;
    use tokio::net::TcpListener;

    /// Pool against a socket that accepts connections and never answers.
    async fn silent_pool() -> PgPool {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        PgPoolOptions::new()
            .acquire_timeout(Duration::from_secs(10))
            .connect_lazy(&format!(
                "postgres://nano:nano@{addr}/nano_url?sslmode=disable"
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_reset_uses_its_own_timeout() {
        let repo = PgLinkRepository::new(Arc::new(silent_pool().await))
            .with_timeout(Duration::from_millis(50))
            .with_reset_timeout(Duration::from_millis(500));

        let started = Instant::now();
        let err = repo.exists("aB3xZ").await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
        assert!(started.elapsed() < Duration::from_millis(400));

        let started = Instant::now();
        let err = repo.reset_all_daily_clicks().await.unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
        assert!(started.elapsed() >= Duration::from_millis(450));
    }
}
