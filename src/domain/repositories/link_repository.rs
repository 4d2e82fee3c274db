//! Repository trait for short link data access.

use crate::domain::entities::{LinkTotals, NewShortLink, ShortLink, ShortLinkPatch};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for short links and their click counters.
///
/// The store's uniqueness constraint on `code` is the final authority on
/// collisions: any write that would duplicate a code fails with
/// [`AppError::Conflict`], regardless of earlier existence checks.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - [`crate::infrastructure::persistence::InMemoryStore`] - In-process store for tests
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Returns whether any link currently uses `code`.
    ///
    /// # Errors
    ///
    /// Returns a store error ([`AppError::Unavailable`] / [`AppError::Internal`])
    /// when the check itself fails.
    async fn exists(&self, code: &str) -> Result<bool, AppError>;

    /// Inserts a new link with zeroed counters.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the code is already taken.
    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError>;

    /// Finds a link by its short code.
    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError>;

    /// Finds a link by its id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError>;

    /// Lists an owner's links, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ShortLink>, AppError>;

    /// Applies a partial update to a link owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no such link belongs to the owner.
    /// Returns [`AppError::Conflict`] if the new code is already taken.
    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ShortLinkPatch,
    ) -> Result<ShortLink, AppError>;

    /// Deletes a link owned by `owner_id`.
    ///
    /// Returns `Ok(false)` when nothing matched.
    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, AppError>;

    /// Atomically bumps `total_clicks` and `daily_clicks` by one and stamps
    /// `last_clicked_at`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link uses `code`.
    async fn increment_click(&self, code: &str) -> Result<(), AppError>;

    /// Sets `daily_clicks = 0` on every link. Returns the number of rows changed.
    async fn reset_all_daily_clicks(&self) -> Result<u64, AppError>;

    /// Store-wide link and click totals.
    async fn totals(&self) -> Result<LinkTotals, AppError>;
}
