//! In-process store backed by concurrent maps.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::{
    AnalyticsDelta, AnalyticsRecord, LinkTotals, NewShortLink, ShortLink, ShortLinkPatch,
};
use crate::domain::repositories::{AnalyticsRepository, LinkRepository};
use crate::error::AppError;

/// In-memory implementation of both repository traits.
///
/// Links are keyed by code, so the map itself enforces code uniqueness:
/// inserts go through [`DashMap::entry`] and a taken code is a conflict.
/// Counter updates mutate the entry under its shard lock, which makes each
/// increment and each analytics delta atomic. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    links: DashMap<String, ShortLink>,
    codes_by_id: DashMap<Uuid, String>,
    analytics: DashMap<Uuid, AnalyticsRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn code_of(&self, id: Uuid) -> Option<String> {
        self.codes_by_id.get(&id).map(|code| code.value().clone())
    }
}

fn code_conflict(code: &str) -> AppError {
    AppError::conflict("Short code already exists", json!({ "code": code }))
}

fn link_not_found(id: Uuid) -> AppError {
    AppError::not_found("Short link not found", json!({ "id": id }))
}

#[async_trait]
impl LinkRepository for InMemoryStore {
    async fn exists(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.contains_key(code))
    }

    async fn insert(&self, new_link: NewShortLink) -> Result<ShortLink, AppError> {
        match self.links.entry(new_link.code.clone()) {
            Entry::Occupied(_) => Err(code_conflict(&new_link.code)),
            Entry::Vacant(slot) => {
                let link = ShortLink::new(
                    Uuid::new_v4(),
                    new_link.owner_id,
                    new_link.destination_url,
                    new_link.code,
                );
                self.codes_by_id.insert(link.id, link.code.clone());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<ShortLink>, AppError> {
        Ok(self.links.get(code).map(|link| link.value().clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ShortLink>, AppError> {
        Ok(self
            .code_of(id)
            .and_then(|code| self.links.get(&code).map(|link| link.value().clone())))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<ShortLink>, AppError> {
        let mut links: Vec<ShortLink> = self
            .links
            .iter()
            .filter(|link| link.owner_id == owner_id)
            .map(|link| link.value().clone())
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(links)
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        patch: ShortLinkPatch,
    ) -> Result<ShortLink, AppError> {
        let old_code = self.code_of(id).ok_or_else(|| link_not_found(id))?;

        let Some(new_code) = patch.code.filter(|code| *code != old_code) else {
            let mut link = self
                .links
                .get_mut(&old_code)
                .filter(|link| link.id == id && link.is_owned_by(owner_id))
                .ok_or_else(|| link_not_found(id))?;
            if let Some(url) = patch.destination_url {
                link.destination_url = url;
            }
            link.updated_at = Utc::now();
            return Ok(link.value().clone());
        };

        if self.links.contains_key(&new_code) {
            return Err(code_conflict(&new_code));
        }

        // The row leaves the old key before it lands on the new one: a click
        // on the old code is either in the moved row or gets NotFound.
        let (_, original) = self
            .links
            .remove_if(&old_code, |_, link| link.id == id && link.is_owned_by(owner_id))
            .ok_or_else(|| link_not_found(id))?;

        let mut moved = original.clone();
        moved.code = new_code.clone();
        if let Some(url) = patch.destination_url {
            moved.destination_url = url;
        }
        moved.updated_at = Utc::now();

        let placed = match self.links.entry(new_code.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(moved.clone());
                true
            }
            Entry::Occupied(_) => false,
        };
        if !placed {
            self.links.entry(old_code).or_insert(original);
            return Err(code_conflict(&new_code));
        }

        self.codes_by_id.insert(id, new_code);
        Ok(moved)
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, AppError> {
        let Some(code) = self.code_of(id) else {
            return Ok(false);
        };

        let removed = self
            .links
            .remove_if(&code, |_, link| link.id == id && link.is_owned_by(owner_id))
            .is_some();
        if removed {
            self.codes_by_id.remove(&id);
        }
        Ok(removed)
    }

    async fn increment_click(&self, code: &str) -> Result<(), AppError> {
        let mut link = self.links.get_mut(code).ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "code": code }))
        })?;

        link.total_clicks += 1;
        link.daily_clicks += 1;
        link.last_clicked_at = Some(Utc::now());
        Ok(())
    }

    async fn reset_all_daily_clicks(&self) -> Result<u64, AppError> {
        let mut changed = 0;
        for mut link in self.links.iter_mut() {
            if link.daily_clicks != 0 {
                link.daily_clicks = 0;
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn totals(&self) -> Result<LinkTotals, AppError> {
        Ok(self
            .links
            .iter()
            .fold(LinkTotals::default(), |mut totals, link| {
                totals.links += 1;
                totals.total_clicks += link.total_clicks;
                totals.daily_clicks += link.daily_clicks;
                totals
            }))
    }
}

#[async_trait]
impl AnalyticsRepository for InMemoryStore {
    async fn apply_delta(
        &self,
        owner_id: Uuid,
        delta: AnalyticsDelta,
    ) -> Result<AnalyticsRecord, AppError> {
        let mut record = self.analytics.entry(owner_id).or_insert_with(|| {
            let now = Utc::now();
            AnalyticsRecord {
                id: Uuid::new_v4(),
                owner_id,
                total_urls: 0,
                total_clicks: 0,
                created_at: now,
                updated_at: now,
            }
        });

        record.total_urls = (record.total_urls + delta.urls).max(0);
        record.total_clicks = (record.total_clicks + delta.clicks).max(0);
        record.updated_at = Utc::now();
        Ok(record.value().clone())
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<AnalyticsRecord>, AppError> {
        Ok(self
            .analytics
            .get(&owner_id)
            .map(|record| record.value().clone()))
    }
}
