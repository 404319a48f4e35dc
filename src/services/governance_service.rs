//! Governance highlight service

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use super::validation::{
    MAX_DESCRIPTION_LEN, MAX_PLACE_LEN, MAX_TITLE_LEN, optional_text, optional_url, required_text,
};
use crate::errors::{CivicError, Result};
use crate::storage::{
    GovernanceHighlight, HighlightCategory, HighlightChanges, HighlightDraft, HighlightFilter,
    HighlightStatus, Page, Paged, SeaOrmStorage,
};
use crate::utils::normalize_optional;

#[derive(Debug, Clone)]
pub struct CreateHighlightRequest {
    pub title: String,
    pub category: HighlightCategory,
    pub state: String,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub status: HighlightStatus,
    pub description: String,
    pub source_name: Option<String>,
    pub source_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub is_visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateHighlightRequest {
    pub title: Option<String>,
    pub category: Option<HighlightCategory>,
    pub state: Option<String>,
    pub district: Option<Option<String>>,
    pub locality: Option<Option<String>>,
    pub status: Option<HighlightStatus>,
    pub description: Option<String>,
    pub source_name: Option<Option<String>>,
    pub source_url: Option<Option<String>>,
    pub published_at: Option<Option<DateTime<Utc>>>,
}

pub struct GovernanceService {
    storage: Arc<SeaOrmStorage>,
}

impl GovernanceService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 调用方负责决定 include_hidden（只有版主及以上可以为 true）
    pub async fn list(
        &self,
        filter: HighlightFilter,
        page: Page,
    ) -> Result<Paged<GovernanceHighlight>> {
        let filter = HighlightFilter {
            state: normalize_optional(filter.state),
            district: normalize_optional(filter.district),
            ..filter
        };
        let (items, total) = self.storage.list_highlights(&filter, page).await?;
        Ok(Paged { items, total })
    }

    /// 全部条目数（不受过滤条件影响）
    pub async fn count(&self) -> Result<u64> {
        self.storage.count_highlights().await
    }

    /// 隐藏的条目对 include_hidden = false 的调用方表现为不存在
    pub async fn get(&self, id: &str, include_hidden: bool) -> Result<GovernanceHighlight> {
        match self.storage.find_highlight(id).await? {
            Some(h) if h.is_visible || include_hidden => Ok(h),
            _ => Err(CivicError::not_found(format!(
                "governance highlight '{}' not found",
                id
            ))),
        }
    }

    pub async fn create(&self, req: CreateHighlightRequest) -> Result<GovernanceHighlight> {
        let draft = HighlightDraft {
            title: required_text("title", &req.title, MAX_TITLE_LEN)?,
            category: req.category,
            state: required_text("state", &req.state, MAX_PLACE_LEN)?,
            district: optional_text("district", req.district, MAX_PLACE_LEN)?,
            locality: optional_text("locality", req.locality, MAX_PLACE_LEN)?,
            status: req.status,
            description: required_text("description", &req.description, MAX_DESCRIPTION_LEN)?,
            source_name: optional_text("sourceName", req.source_name, MAX_TITLE_LEN)?,
            source_url: optional_url("sourceUrl", req.source_url)?,
            published_at: req.published_at,
            is_visible: req.is_visible,
        };
        self.storage.insert_highlight(draft).await
    }

    pub async fn update(
        &self,
        id: &str,
        req: UpdateHighlightRequest,
    ) -> Result<GovernanceHighlight> {
        let changes = HighlightChanges {
            title: req
                .title
                .map(|v| required_text("title", &v, MAX_TITLE_LEN))
                .transpose()?,
            category: req.category,
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
            status: req.status,
            description: req
                .description
                .map(|v| required_text("description", &v, MAX_DESCRIPTION_LEN))
                .transpose()?,
            source_name: req
                .source_name
                .map(|v| optional_text("sourceName", v, MAX_TITLE_LEN))
                .transpose()?,
            source_url: req
                .source_url
                .map(|v| optional_url("sourceUrl", v))
                .transpose()?,
            published_at: req.published_at,
        };
        let updated = self.storage.update_highlight(id, changes).await?;
        info!("Governance highlight updated: {}", id);
        Ok(updated)
    }

    pub async fn set_visibility(&self, id: &str, visible: bool) -> Result<GovernanceHighlight> {
        let updated = self.storage.set_highlight_visibility(id, visible).await?;
        info!("Governance highlight {} visible={}", id, visible);
        Ok(updated)
    }

    pub async fn set_verified(&self, id: &str, verified: bool) -> Result<GovernanceHighlight> {
        let updated = self.storage.set_highlight_verified(id, verified).await?;
        info!("Governance highlight {} verified={}", id, verified);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.storage.delete_highlight(id).await? {
            return Err(CivicError::not_found(format!(
                "governance highlight '{}' not found",
                id
            )));
        }
        info!("Governance highlight deleted: {}", id);
        Ok(())
    }
}
