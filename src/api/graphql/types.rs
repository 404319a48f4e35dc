//! GraphQL input and page types

use async_graphql::{InputObject, MaybeUndefined, SimpleObject};
use chrono::{DateTime, Utc};

use crate::errors::{CivicError, Result};
use crate::services::{
    CreateAtrocityRequest, CreateHighlightRequest, UpdateAtrocityRequest, UpdateHighlightRequest,
};
use crate::storage::{
    Atrocity, AtrocityFilter, GovernanceHighlight, HighlightCategory, HighlightFilter,
    HighlightStatus, Page, Paged, User,
};

/// undefined → 不修改，null → 清空
fn patch<T>(value: MaybeUndefined<T>) -> Option<Option<T>> {
    match value {
        MaybeUndefined::Undefined => None,
        MaybeUndefined::Null => Some(None),
        MaybeUndefined::Value(v) => Some(Some(v)),
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct PageInput {
    /// 1..=100, default 20
    pub limit: Option<i32>,
    pub offset: Option<i32>,
}

impl PageInput {
    pub fn into_page(self) -> Result<Page> {
        let to_u64 = |field: &str, v: Option<i32>| -> Result<Option<u64>> {
            v.map(|n| {
                u64::try_from(n)
                    .map_err(|_| CivicError::validation(format!("{} must not be negative", field)))
            })
            .transpose()
        };
        Ok(Page::new(
            to_u64("limit", self.limit)?,
            to_u64("offset", self.offset)?,
        ))
    }
}

pub fn page_from(input: Option<PageInput>) -> Result<Page> {
    input.unwrap_or_default().into_page()
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct AtrocityFilterInput {
    pub state: Option<String>,
    pub district: Option<String>,
    pub verified: Option<bool>,
    pub search: Option<String>,
}

impl From<AtrocityFilterInput> for AtrocityFilter {
    fn from(input: AtrocityFilterInput) -> Self {
        AtrocityFilter {
            state: input.state,
            district: input.district,
            verified: input.verified,
            search: input.search,
        }
    }
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateAtrocityInput {
    pub title: String,
    pub state: String,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub description: String,
    #[graphql(default)]
    pub images: Vec<String>,
    pub occurred_at: Option<DateTime<Utc>>,
}

impl From<CreateAtrocityInput> for CreateAtrocityRequest {
    fn from(input: CreateAtrocityInput) -> Self {
        CreateAtrocityRequest {
            title: input.title,
            state: input.state,
            district: input.district,
            locality: input.locality,
            description: input.description,
            images: input.images,
            occurred_at: input.occurred_at,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateAtrocityInput {
    pub title: Option<String>,
    pub state: Option<String>,
    pub district: MaybeUndefined<String>,
    pub locality: MaybeUndefined<String>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub occurred_at: MaybeUndefined<DateTime<Utc>>,
}

impl From<UpdateAtrocityInput> for UpdateAtrocityRequest {
    fn from(input: UpdateAtrocityInput) -> Self {
        UpdateAtrocityRequest {
            title: input.title,
            state: input.state,
            district: patch(input.district),
            locality: patch(input.locality),
            description: input.description,
            images: input.images,
            occurred_at: patch(input.occurred_at),
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct GovernanceHighlightFilterInput {
    pub category: Option<HighlightCategory>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub status: Option<HighlightStatus>,
    /// Only honoured for moderators and admins
    pub include_hidden: Option<bool>,
}

impl GovernanceHighlightFilterInput {
    pub fn into_filter(self, may_see_hidden: bool) -> HighlightFilter {
        HighlightFilter {
            category: self.category,
            state: self.state,
            district: self.district,
            status: self.status,
            include_hidden: may_see_hidden && self.include_hidden.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, InputObject)]
pub struct CreateGovernanceHighlightInput {
    pub title: String,
    pub category: HighlightCategory,
    pub state: String,
    pub district: Option<String>,
    pub locality: Option<String>,
    #[graphql(default_with = "HighlightStatus::Proposed")]
    pub status: HighlightStatus,
    pub description: String,
    pub source_name: Option<String>,
    pub source_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    #[graphql(default = true)]
    pub is_visible: bool,
}

impl From<CreateGovernanceHighlightInput> for CreateHighlightRequest {
    fn from(input: CreateGovernanceHighlightInput) -> Self {
        CreateHighlightRequest {
            title: input.title,
            category: input.category,
            state: input.state,
            district: input.district,
            locality: input.locality,
            status: input.status,
            description: input.description,
            source_name: input.source_name,
            source_url: input.source_url,
            published_at: input.published_at,
            is_visible: input.is_visible,
        }
    }
}

#[derive(Debug, Clone, Default, InputObject)]
pub struct UpdateGovernanceHighlightInput {
    pub title: Option<String>,
    pub category: Option<HighlightCategory>,
    pub state: Option<String>,
    pub district: MaybeUndefined<String>,
    pub locality: MaybeUndefined<String>,
    pub status: Option<HighlightStatus>,
    pub description: Option<String>,
    pub source_name: MaybeUndefined<String>,
    pub source_url: MaybeUndefined<String>,
    pub published_at: MaybeUndefined<DateTime<Utc>>,
}

impl From<UpdateGovernanceHighlightInput> for UpdateHighlightRequest {
    fn from(input: UpdateGovernanceHighlightInput) -> Self {
        UpdateHighlightRequest {
            title: input.title,
            category: input.category,
            state: input.state,
            district: patch(input.district),
            locality: patch(input.locality),
            status: input.status,
            description: input.description,
            source_name: patch(input.source_name),
            source_url: patch(input.source_url),
            published_at: patch(input.published_at),
        }
    }
}

#[derive(Debug, Clone, SimpleObject)]
pub struct AtrocityPage {
    pub items: Vec<Atrocity>,
    pub total: i64,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct GovernanceHighlightPage {
    pub items: Vec<GovernanceHighlight>,
    pub total: i64,
}

#[derive(Debug, Clone, SimpleObject)]
pub struct UserPage {
    pub items: Vec<User>,
    pub total: i64,
}

fn total_of(total: u64) -> i64 {
    i64::try_from(total).unwrap_or(i64::MAX)
}

impl From<Paged<Atrocity>> for AtrocityPage {
    fn from(page: Paged<Atrocity>) -> Self {
        Self {
            items: page.items,
            total: total_of(page.total),
        }
    }
}

impl From<Paged<GovernanceHighlight>> for GovernanceHighlightPage {
    fn from(page: Paged<GovernanceHighlight>) -> Self {
        Self {
            items: page.items,
            total: total_of(page.total),
        }
    }
}

impl From<Paged<User>> for UserPage {
    fn from(page: Paged<User>) -> Self {
        Self {
            items: page.items,
            total: total_of(page.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_input_defaults_and_clamps() {
        assert_eq!(page_from(None).ok(), Some(Page { limit: 20, offset: 0 }));
        let page = PageInput {
            limit: Some(500),
            offset: Some(40),
        };
        assert_eq!(page.into_page().ok(), Some(Page { limit: 100, offset: 40 }));
    }

    #[test]
    fn test_negative_offset_rejected() {
        let page = PageInput {
            limit: None,
            offset: Some(-1),
        };
        assert!(page.into_page().is_err());
    }

    #[test]
    fn test_patch_semantics() {
        let input = UpdateAtrocityInput {
            district: MaybeUndefined::Null,
            locality: MaybeUndefined::Value("Ward 5".into()),
            ..Default::default()
        };
        let req = UpdateAtrocityRequest::from(input);
        assert_eq!(req.district, Some(None));
        assert_eq!(req.locality, Some(Some("Ward 5".to_string())));
        assert_eq!(req.occurred_at, None);
        assert_eq!(req.title, None);
    }

    #[test]
    fn test_hidden_filter_requires_privilege() {
        let input = GovernanceHighlightFilterInput {
            include_hidden: Some(true),
            ..Default::default()
        };
        assert!(!input.clone().into_filter(false).include_hidden);
        assert!(input.into_filter(true).include_hidden);
    }
}
