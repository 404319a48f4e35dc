use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use tracing::info;
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::model_to_highlight;
use crate::errors::{CivicError, Result};
use crate::storage::models::{
    GovernanceHighlight, HighlightChanges, HighlightDraft, HighlightFilter, Page,
};
use migration::entities::governance_highlight as highlight;

fn filter_condition(filter: &HighlightFilter) -> Condition {
    let mut condition = Condition::all();

    if !filter.include_hidden {
        condition = condition.add(highlight::Column::IsVisible.eq(true));
    }
    if let Some(category) = filter.category {
        condition = condition.add(highlight::Column::Category.eq(category.as_ref()));
    }
    if let Some(status) = filter.status {
        condition = condition.add(highlight::Column::Status.eq(status.as_ref()));
    }
    if let Some(ref state) = filter.state {
        condition = condition.add(highlight::Column::State.eq(state.as_str()));
    }
    if let Some(ref district) = filter.district {
        condition = condition.add(highlight::Column::District.eq(district.as_str()));
    }

    condition
}

impl SeaOrmStorage {
    pub async fn insert_highlight(&self, draft: HighlightDraft) -> Result<GovernanceHighlight> {
        let now = Utc::now();
        let row = highlight::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(draft.title),
            category: Set(draft.category.as_ref().to_string()),
            state: Set(draft.state),
            district: Set(draft.district),
            locality: Set(draft.locality),
            status: Set(draft.status.as_ref().to_string()),
            description: Set(draft.description),
            source_name: Set(draft.source_name),
            source_url: Set(draft.source_url),
            published_at: Set(draft.published_at),
            is_visible: Set(draft.is_visible),
            is_verified: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = row.insert(&self.db).await?;
        info!("Governance highlight created: {} [{}]", model.id, model.category);
        Ok(model_to_highlight(model))
    }

    pub async fn find_highlight(&self, id: &str) -> Result<Option<GovernanceHighlight>> {
        let model = highlight::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_highlight))
    }

    /// 最新创建的排在前面
    pub async fn list_highlights(
        &self,
        filter: &HighlightFilter,
        page: Page,
    ) -> Result<(Vec<GovernanceHighlight>, u64)> {
        let condition = filter_condition(filter);

        let total = highlight::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        let models = highlight::Entity::find()
            .filter(condition)
            .order_by_desc(highlight::Column::CreatedAt)
            .order_by_asc(highlight::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(model_to_highlight).collect(), total))
    }

    pub async fn update_highlight(
        &self,
        id: &str,
        changes: HighlightChanges,
    ) -> Result<GovernanceHighlight> {
        let model = self.require_highlight_model(id).await?;
        let mut active: highlight::ActiveModel = model.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
        }
        if let Some(category) = changes.category {
            active.category = Set(category.as_ref().to_string());
        }
        if let Some(state) = changes.state {
            active.state = Set(state);
        }
        if let Some(district) = changes.district {
            active.district = Set(district);
        }
        if let Some(locality) = changes.locality {
            active.locality = Set(locality);
        }
        if let Some(status) = changes.status {
            active.status = Set(status.as_ref().to_string());
        }
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(source_name) = changes.source_name {
            active.source_name = Set(source_name);
        }
        if let Some(source_url) = changes.source_url {
            active.source_url = Set(source_url);
        }
        if let Some(published_at) = changes.published_at {
            active.published_at = Set(published_at);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(model_to_highlight(model))
    }

    pub async fn set_highlight_visibility(
        &self,
        id: &str,
        visible: bool,
    ) -> Result<GovernanceHighlight> {
        let model = self.require_highlight_model(id).await?;
        let mut active: highlight::ActiveModel = model.into();
        active.is_visible = Set(visible);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_highlight(model))
    }

    pub async fn set_highlight_verified(
        &self,
        id: &str,
        verified: bool,
    ) -> Result<GovernanceHighlight> {
        let model = self.require_highlight_model(id).await?;
        let mut active: highlight::ActiveModel = model.into();
        active.is_verified = Set(verified);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_highlight(model))
    }

    pub async fn delete_highlight(&self, id: &str) -> Result<bool> {
        let result = highlight::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_highlights(&self) -> Result<u64> {
        Ok(highlight::Entity::find().count(&self.db).await?)
    }

    async fn require_highlight_model(&self, id: &str) -> Result<highlight::Model> {
        highlight::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| CivicError::not_found(format!("governance highlight '{}' not found", id)))
    }
}
