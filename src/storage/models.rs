use async_graphql::{Enum, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// 全局访客计数（单行表）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct VisitorStats {
    pub id: String,
    pub total_visitors: i64,
    pub updated_at: DateTime<Utc>,
}

/// 用户角色，按权限从低到高排列
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Enum,
    EnumString,
    EnumIter,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[default]
    User,
    Moderator,
    Admin,
}

impl Role {
    /// 是否拥有 `required` 及以上的权限
    pub fn at_least(self, required: Role) -> bool {
        self >= required
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 登录用：用户 + 密码哈希（不会离开服务层）
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Atrocity {
    pub id: String,
    pub title: String,
    pub state: String,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub description: String,
    pub images: Vec<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub is_verified: bool,
    pub reported_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建报告（已校验）
#[derive(Debug, Clone, Default)]
pub struct AtrocityDraft {
    pub title: String,
    pub state: String,
    pub district: Option<String>,
    pub locality: Option<String>,
    pub description: String,
    pub images: Vec<String>,
    pub occurred_at: Option<DateTime<Utc>>,
    pub reported_by: Option<String>,
}

/// 部分更新：外层 None = 不修改，`Some(None)` = 清空
#[derive(Debug, Clone, Default)]
pub struct AtrocityChanges {
    pub title: Option<String>,
    pub state: Option<String>,
    pub district: Option<Option<String>>,
    pub locality: Option<Option<String>>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
    pub occurred_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Default)]
pub struct AtrocityFilter {
    pub state: Option<String>,
    pub district: Option<String>,
    pub verified: Option<bool>,
    /// 模糊搜索 title / description
    pub search: Option<String>,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Enum,
    EnumString,
    EnumIter,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HighlightCategory {
    Infrastructure,
    Health,
    Education,
    Welfare,
    Economy,
    Environment,
    LawAndOrder,
    Other,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Enum,
    EnumString,
    EnumIter,
    AsRefStr,
    Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum HighlightStatus {
    Proposed,
    InProgress,
    Completed,
    Stalled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceHighlight {
    pub id: String,
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
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct HighlightDraft {
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
pub struct HighlightChanges {
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

#[derive(Debug, Clone, Default)]
pub struct HighlightFilter {
    pub category: Option<HighlightCategory>,
    pub state: Option<String>,
    pub district: Option<String>,
    pub status: Option<HighlightStatus>,
    /// false 时只返回 is_visible = true 的记录
    pub include_hidden: bool,
}

/// 分页参数（已规范化）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Page {
    pub const DEFAULT_LIMIT: u64 = 20;
    pub const MAX_LIMIT: u64 = 100;

    /// limit 限制在 1..=MAX_LIMIT
    pub fn new(limit: Option<u64>, offset: Option<u64>) -> Self {
        Self {
            limit: limit
                .unwrap_or(Self::DEFAULT_LIMIT)
                .clamp(1, Self::MAX_LIMIT),
            offset: offset.unwrap_or(0),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// 分页结果
#[derive(Debug, Clone)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_role_ordering() {
        assert!(Role::Admin.at_least(Role::Moderator));
        assert!(Role::Moderator.at_least(Role::Moderator));
        assert!(!Role::User.at_least(Role::Moderator));
    }

    #[test]
    fn test_role_string_form() {
        assert_eq!(Role::Moderator.as_ref(), "moderator");
        assert_eq!(Role::from_str("ADMIN").ok(), Some(Role::Admin));
        assert!(Role::from_str("superuser").is_err());
    }

    #[test]
    fn test_category_string_form() {
        assert_eq!(HighlightCategory::LawAndOrder.as_ref(), "law_and_order");
        assert_eq!(
            HighlightStatus::from_str("in_progress").ok(),
            Some(HighlightStatus::InProgress)
        );
    }

    #[test]
    fn test_page_clamps_limit() {
        assert_eq!(Page::new(Some(0), None).limit, 1);
        assert_eq!(Page::new(Some(10_000), Some(5)), Page { limit: 100, offset: 5 });
        assert_eq!(Page::default().limit, Page::DEFAULT_LIMIT);
    }
}
