//! Link lifecycle service: create, resolve, list, update and delete.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::services::{AnalyticsAggregator, CodeAllocator};
use crate::domain::entities::{NewShortLink, ShortLink, ShortLinkPatch};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::CodeGenerator;
use crate::utils::url_validation::validate_destination;

/// Orchestrates the lifecycle of an owner's short links.
///
/// Code uniqueness is delegated to [`CodeAllocator`] and, ultimately, to the
/// store's uniqueness constraint. Every link created or deleted is reflected
/// in the owner's analytics before the call returns.
pub struct LinkService<L, A>
where
    L: LinkRepository + ?Sized,
    A: AnalyticsRepository + ?Sized,
{
    links: Arc<L>,
    allocator: CodeAllocator<L>,
    analytics: AnalyticsAggregator<A>,
}

impl<L, A> LinkService<L, A>
where
    L: LinkRepository + ?Sized,
    A: AnalyticsRepository + ?Sized,
{
    pub fn new(links: Arc<L>, analytics: AnalyticsAggregator<A>, generator: CodeGenerator) -> Self {
        Self {
            allocator: CodeAllocator::new(Arc::clone(&links), generator),
            links,
            analytics,
        }
    }

    /// Creates a short link for `owner_id`.
    ///
    /// # Flow
    ///
    /// 1. Validate the destination (absolute HTTP(S) URL)
    /// 2. Allocate a code (preferred or generated)
    /// 3. Insert the link
    /// 4. Add one URL to the owner's analytics
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a bad URL or malformed preferred code
    /// - [`AppError::Conflict`] if the code is taken, including when another
    ///   writer inserted it between allocation and insert
    /// - Store errors from any step abort the request
    pub async fn create_short_link(
        &self,
        owner_id: Uuid,
        destination_url: &str,
        preferred_code: Option<&str>,
    ) -> Result<ShortLink, AppError> {
        let destination_url = validate_destination(destination_url)?;
        let code = self.allocator.allocate(preferred_code).await?;

        let link = self
            .links
            .insert(NewShortLink {
                owner_id,
                destination_url,
                code,
            })
            .await?;

        self.analytics.apply_delta(owner_id, 1, 0).await?;

        info!(
            link_id = %link.id,
            code = %link.code,
            %owner_id,
            "Short link created"
        );
        Ok(link)
    }

    /// Looks up a link by its code, regardless of owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link uses `code`.
    pub async fn resolve(&self, code: &str) -> Result<ShortLink, AppError> {
        self.links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "code": code })))
    }

    pub async fn list_links(&self, owner_id: Uuid) -> Result<Vec<ShortLink>, AppError> {
        self.links.list_by_owner(owner_id).await
    }

    /// Returns a link only if it belongs to `owner_id`.
    ///
    /// A link owned by someone else is reported as missing, so ids of other
    /// owners cannot be probed.
    pub async fn get_owned_link(&self, owner_id: Uuid, id: Uuid) -> Result<ShortLink, AppError> {
        self.links
            .find_by_id(id)
            .await?
            .filter(|link| link.is_owned_by(owner_id))
            .ok_or_else(|| AppError::not_found("Short link not found", json!({ "id": id })))
    }

    /// Changes the destination and/or the code of an owned link.
    ///
    /// An empty update returns the link unchanged. A new code goes through the
    /// same validation and existence check as a preferred code on create;
    /// re-submitting the current code is not a conflict.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the link does not belong to the owner
    /// - [`AppError::Validation`] / [`AppError::Conflict`] as for create
    pub async fn update_link(
        &self,
        owner_id: Uuid,
        id: Uuid,
        destination_url: Option<&str>,
        code: Option<&str>,
    ) -> Result<ShortLink, AppError> {
        let current = self.get_owned_link(owner_id, id).await?;

        let destination_url = destination_url.map(validate_destination).transpose()?;
        let code = match code {
            Some(code) if code != current.code => Some(self.allocator.allocate(Some(code)).await?),
            _ => None,
        };

        let patch = ShortLinkPatch {
            destination_url,
            code,
        };
        if patch.is_empty() {
            debug!(link_id = %id, "Empty update, link unchanged");
            return Ok(current);
        }

        let link = self.links.update(id, owner_id, patch).await?;
        info!(link_id = %id, code = %link.code, "Short link updated");
        Ok(link)
    }

    /// Deletes an owned link and removes it from the owner's URL count.
    ///
    /// The owner's `total_clicks` keeps the clicks the link received.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the link does not belong to the owner.
    pub async fn delete_link(&self, owner_id: Uuid, id: Uuid) -> Result<(), AppError> {
        if !self.links.delete(id, owner_id).await? {
            return Err(AppError::not_found(
                "Short link not found",
                json!({ "id": id }),
            ));
        }

        self.analytics.apply_delta(owner_id, -1, 0).await?;

        info!(link_id = %id, %owner_id, "Short link deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{AnalyticsDelta, AnalyticsRecord};
    use crate::domain::repositories::{MockAnalyticsRepository, MockLinkRepository};
    use chrono::Utc;

    fn link(owner_id: Uuid, code: &str, url: &str) -> ShortLink {
        ShortLink::new(Uuid::new_v4(), owner_id, url.to_string(), code.to_string())
    }

    fn record(owner_id: Uuid) -> AnalyticsRecord {
        AnalyticsRecord {
            id: Uuid::new_v4(),
            owner_id,
            total_urls: 1,
            total_clicks: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service(
        links: MockLinkRepository,
        analytics: MockAnalyticsRepository,
    ) -> LinkService<MockLinkRepository, MockAnalyticsRepository> {
        LinkService::new(
            Arc::new(links),
            AnalyticsAggregator::new(Arc::new(analytics)),
            CodeGenerator::default(),
        )
    }

    #[tokio::test]
    async fn test_create_short_link_with_generated_code() {
        let owner = Uuid::new_v4();

        let mut links = MockLinkRepository::new();
        links.expect_exists().times(1).returning(|_| Ok(false));
        links
            .expect_insert()
            .withf(move |new| new.owner_id == owner && new.destination_url == "https://example.com")
            .times(1)
            .returning(|new| {
                Ok(ShortLink::new(
                    Uuid::new_v4(),
                    new.owner_id,
                    new.destination_url,
                    new.code,
                ))
            });

        let mut analytics = MockAnalyticsRepository::new();
        analytics
            .expect_apply_delta()
            .withf(move |id, delta| *id == owner && *delta == AnalyticsDelta::LINK_CREATED)
            .times(1)
            .returning(|id, _| Ok(record(id)));

        let created = service(links, analytics)
            .create_short_link(owner, "https://example.com", None)
            .await
            .unwrap();

        assert_eq!(created.code.len(), 5);
        assert_eq!(created.total_clicks, 0);
        assert_eq!(created.owner_id, owner);
    }

    #[tokio::test]
    async fn test_create_short_link_rejects_invalid_url_before_store() {
        let mut links = MockLinkRepository::new();
        links.expect_exists().times(0);
        links.expect_insert().times(0);

        let err = service(links, MockAnalyticsRepository::new())
            .create_short_link(Uuid::new_v4(), "javascript:alert(1)", None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_create_short_link_insert_race_is_conflict() {
        let mut links = MockLinkRepository::new();
        links.expect_exists().times(1).returning(|_| Ok(false));
        links.expect_insert().times(1).returning(|new| {
            Err(AppError::conflict(
                "Short code already exists",
                json!({ "code": new.code }),
            ))
        });

        let mut analytics = MockAnalyticsRepository::new();
        analytics.expect_apply_delta().times(0);

        let err = service(links, analytics)
            .create_short_link(Uuid::new_v4(), "https://example.com", Some("promo1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_create_short_link_aborts_on_analytics_failure() {
        let mut links = MockLinkRepository::new();
        links.expect_exists().returning(|_| Ok(false));
        links.expect_insert().returning(|new| {
            Ok(ShortLink::new(
                Uuid::new_v4(),
                new.owner_id,
                new.destination_url,
                new.code,
            ))
        });

        let mut analytics = MockAnalyticsRepository::new();
        analytics
            .expect_apply_delta()
            .times(1)
            .returning(|_, _| Err(AppError::unavailable("Store unavailable", json!({}))));

        let err = service(links, analytics)
            .create_short_link(Uuid::new_v4(), "https://example.com", None)
            .await
            .unwrap_err();

        assert!(err.is_store_error());
    }

    #[tokio::test]
    async fn test_resolve_missing_code() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().times(1).returning(|_| Ok(None));

        let err = service(links, MockAnalyticsRepository::new())
            .resolve("nope1")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_get_owned_link_hides_foreign_links() {
        let stranger = Uuid::new_v4();
        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .times(1)
            .returning(|_| Ok(Some(link(Uuid::new_v4(), "aB3xZ", "https://example.com"))));

        let err = service(links, MockAnalyticsRepository::new())
            .get_owned_link(stranger, Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_update_link_same_code_is_noop() {
        let owner = Uuid::new_v4();
        let existing = link(owner, "aB3xZ", "https://example.com");
        let id = existing.id;

        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        links.expect_exists().times(0);
        links.expect_update().times(0);

        let updated = service(links, MockAnalyticsRepository::new())
            .update_link(owner, id, None, Some("aB3xZ"))
            .await
            .unwrap();

        assert_eq!(updated.code, "aB3xZ");
    }

    #[tokio::test]
    async fn test_update_link_new_code_and_url() {
        let owner = Uuid::new_v4();
        let existing = link(owner, "aB3xZ", "https://example.com");
        let id = existing.id;

        let mut links = MockLinkRepository::new();
        let current = existing.clone();
        links
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(current.clone())));
        links
            .expect_exists()
            .withf(|code| code == "summer-sale")
            .times(1)
            .returning(|_| Ok(false));
        links
            .expect_update()
            .withf(move |link_id, owner_id, patch| {
                *link_id == id
                    && *owner_id == owner
                    && patch.code.as_deref() == Some("summer-sale")
                    && patch.destination_url.as_deref() == Some("https://example.org")
            })
            .times(1)
            .returning(move |_, _, patch| {
                let mut updated = existing.clone();
                updated.code = patch.code.unwrap_or(updated.code);
                updated.destination_url = patch.destination_url.unwrap_or(updated.destination_url);
                Ok(updated)
            });

        let updated = service(links, MockAnalyticsRepository::new())
            .update_link(owner, id, Some("https://example.org"), Some("summer-sale"))
            .await
            .unwrap();

        assert_eq!(updated.code, "summer-sale");
        assert_eq!(updated.destination_url, "https://example.org");
    }

    #[tokio::test]
    async fn test_update_link_taken_code_conflicts() {
        let owner = Uuid::new_v4();
        let existing = link(owner, "aB3xZ", "https://example.com");
        let id = existing.id;

        let mut links = MockLinkRepository::new();
        links
            .expect_find_by_id()
            .returning(move |_| Ok(Some(existing.clone())));
        links.expect_exists().times(1).returning(|_| Ok(true));
        links.expect_update().times(0);

        let err = service(links, MockAnalyticsRepository::new())
            .update_link(owner, id, None, Some("taken1"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_delete_link_decrements_url_count() {
        let owner = Uuid::new_v4();

        let mut links = MockLinkRepository::new();
        links.expect_delete().times(1).returning(|_, _| Ok(true));

        let mut analytics = MockAnalyticsRepository::new();
        analytics
            .expect_apply_delta()
            .withf(move |id, delta| *id == owner && *delta == AnalyticsDelta::LINK_DELETED)
            .times(1)
            .returning(|id, _| Ok(record(id)));

        service(links, analytics)
            .delete_link(owner, Uuid::new_v4())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_link_leaves_analytics() {
        let mut links = MockLinkRepository::new();
        links.expect_delete().times(1).returning(|_, _| Ok(false));

        let mut analytics = MockAnalyticsRepository::new();
        analytics.expect_apply_delta().times(0);

        let err = service(links, analytics)
            .delete_link(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
