//! Atrocity report service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::validation::{
    MAX_DESCRIPTION_LEN, MAX_PLACE_LEN, MAX_TITLE_LEN, image_urls, optional_text, required_text,
};
use crate::errors::{CivicError, Result};
use crate::storage::{
    Atrocity, AtrocityChanges, AtrocityDraft, AtrocityFilter, Page, Paged, SeaOrmStorage,
};
use crate::utils::normalize_optional;

/// New report as submitted by a client
#[derive(Debug, Clone, Default)]
pub struct CreateAtrocityRequest {
    pub title: String,
    pub state: String,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub description: String,
    pub images: Vec<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

/// Partial update; `None` keeps the stored value, `Some(None)` clears it
#[derive(Debug, Clone, Default)]
pub struct UpdateAtrocityRequest {
    pub title: Option<String>,
    pub state: Option<String>,
    pub district: Option<Option<String>>,
    pub locality: Option<Option<String>>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub occurred_at: Option<Option<DateTime<Utc>>>,
}

pub struct AtrocityService {
    storage: Arc<SeaOrmStorage>,
}

impl AtrocityService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    pub async fn list(&self, filter: AtrocityFilter, page: Page) -> Result<Paged<Atrocity>> {
        let filter = AtrocityFilter {
            state: normalize_optional(filter.state),
            district: normalize_optional(filter.district),
            verified: filter.verified,
            search: normalize_optional(filter.search),
        };
        let (items, total) = self.storage.list_atrocities(&filter, page).await?;
        Ok(Paged { items, total })
    }

    /// 全部条目数（不受过滤条件影响）
    pub async fn count(&self) -> Result<u64> {
        self.storage.count_atrocities().await
    }

    pub async fn get(&self, id: &str) -> Result<Atrocity> {
        self.storage
            .find_atrocity(id)
            .await?
            .ok_or_else(|| CivicError::not_found(format!("atrocity '{}' not found", id)))
    }

    /// Create an unverified report; `reported_by` is the submitting user, if any.
    pub async fn create(
        &self,
        req: CreateAtrocityRequest,
        reported_by: Option<String>,
    ) -> Result<Atrocity> {
        let draft = AtrocityDraft {
            title: required_text("title", &req.title, MAX_TITLE_LEN)?,
            state: required_text("state", &req.state, MAX_PLACE_LEN)?,
            district: optional_text("district", req.district, MAX_PLACE_LEN)?,
            locality: optional_text("locality", req.locality, MAX_PLACE_LEN)?,
            description: required_text("description", &req.description, MAX_DESCRIPTION_LEN)?,
            images: image_urls(req.images)?,
            occurred_at: req.occurred_at,
            reported_by,
        };
        self.storage.insert_atrocity(draft).await
    }

    pub async fn update(&self, id: &str, req: UpdateAtrocityRequest) -> Result<Atrocity> {
        let changes = AtrocityChanges {
            title: req
                .title
                .map(|v| required_text("title", &v, MAX_TITLE_LEN))
                .transpose()?,
            state: req
                .state
                .map(|v| required_text("state", &v, MAX_PLACE_LEN))
                .transpose()?,
            district: req
                .district
                .map(|v| optional_text("district", v, MAX_PLACE_LEN))
                .transpose()?,
            locality: req
                .locality
                .map(|v| optional_text("locality", v, MAX_PLACE_LEN))
                .transpose()?,
            description: req
                .description
                .map(|v| required_text("description", &v, MAX_DESCRIPTION_LEN))
                .transpose()?,
            images: req.images.map(image_urls).transpose()?,
            occurred_at: req.occurred_at,
        };
        let updated = self.storage.update_atrocity(id, changes).await?;
        info!("Atrocity report updated: {}", id);
        Ok(updated)
    }

    pub async fn set_verified(&self, id: &str, verified: bool) -> Result<Atrocity> {
        let updated = self.storage.set_atrocity_verified(id, verified).await?;
        info!("Atrocity report {} verified={}", id, verified);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.storage.delete_atrocity(id).await? {
            return Err(CivicError::not_found(format!("atrocity '{}' not found", id)));
        }
        info!("Atrocity report deleted: {}", id);
        Ok(())
    }
}
