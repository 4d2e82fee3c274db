//! Store implementations of the domain repository traits.
//!
//! # Repositories
//!
//! - [`PgLinkRepository`] - Short links and click counters in PostgreSQL
//! - [`PgAnalyticsRepository`] - Per-owner analytics in PostgreSQL
//! - [`InMemoryStore`] - Both traits over concurrent maps, for tests and local runs
//!
//! Every PostgreSQL call is bounded by a per-operation timeout; an elapsed
//! timeout surfaces as [`AppError::Unavailable`]. The bulk daily reset has
//! its own, longer bound.

use std::future::Future;
use std::time::Duration;

use serde_json::json;
use tracing::warn;

use crate::error::AppError;

pub mod memory;
pub mod pg_analytics_repository;
pub mod pg_link_repository;

pub use memory::InMemoryStore;
pub use pg_analytics_repository::PgAnalyticsRepository;
pub use pg_link_repository::PgLinkRepository;

/// Default bound on a single store operation.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default bound on the bulk daily reset, which touches every link.
pub const DEFAULT_RESET_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs a query under `limit`, mapping both query and timeout failures to
/// [`AppError`].
pub(crate) async fn bounded<T, F>(limit: Duration, operation: &'static str, query: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match tokio::time::timeout(limit, query).await {
        Ok(result) => result.map_err(AppError::from),
        Err(_) => {
            warn!(operation, timeout_ms = limit.as_millis() as u64, "Store operation timed out");
            Err(AppError::unavailable(
                "Store operation timed out",
                json!({ "operation": operation }),
            ))
        }
    }
}
