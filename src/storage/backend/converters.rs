use std::str::FromStr;

use tracing::warn;

use crate::storage::models::{
    Atrocity, GovernanceHighlight, HighlightCategory, HighlightStatus, Role, User, VisitorStats,
};
use migration::entities::{atrocity, governance_highlight, user, visitor_stats};

/// images 列以 JSON 数组文本保存
pub fn encode_images(images: &[String]) -> String {
    serde_json::to_string(images).unwrap_or_else(|_| "[]".to_string())
}

pub fn decode_images(raw: &str) -> Vec<String> {
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Malformed images column ({}), treating as empty", e);
        Vec::new()
    })
}

pub fn model_to_visitor_stats(model: visitor_stats::Model) -> VisitorStats {
    VisitorStats {
        id: model.id,
        total_visitors: model.total_visitors.max(0),
        updated_at: model.updated_at,
    }
}

pub fn model_to_user(model: user::Model) -> User {
    let role = Role::from_str(&model.role).unwrap_or_else(|_| {
        warn!("Unknown role '{}' for user {}, using 'user'", model.role, model.id);
        Role::User
    });
    User {
        id: model.id,
        name: model.name,
        email: model.email,
        role,
        is_verified: model.is_verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_atrocity(model: atrocity::Model) -> Atrocity {
    Atrocity {
        images: decode_images(&model.images),
        id: model.id,
        title: model.title,
        state: model.state,
        district: model.district,
        locality: model.locality,
        description: model.description,
        occurred_at: model.occurred_at,
        is_verified: model.is_verified,
        reported_by: model.reported_by,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn model_to_highlight(model: governance_highlight::Model) -> GovernanceHighlight {
    let category = HighlightCategory::from_str(&model.category).unwrap_or_else(|_| {
        warn!("Unknown category '{}' on highlight {}", model.category, model.id);
        HighlightCategory::Other
    });
    let status = HighlightStatus::from_str(&model.status).unwrap_or_else(|_| {
        warn!("Unknown status '{}' on highlight {}", model.status, model.id);
        HighlightStatus::Proposed
    });
    GovernanceHighlight {
        id: model.id,
        title: model.title,
        category,
        state: model.state,
        district: model.district,
        locality: model.locality,
        status,
        description: model.description,
        source_name: model.source_name,
        source_url: model.source_url,
        published_at: model.published_at,
        is_visible: model.is_visible,
        is_verified: model.is_verified,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
