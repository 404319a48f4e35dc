use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use tracing::info;
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::{encode_images, model_to_atrocity};
use crate::errors::{CivicError, Result};
use crate::storage::models::{Atrocity, AtrocityChanges, AtrocityDraft, AtrocityFilter, Page};
use migration::entities::atrocity;

fn filter_condition(filter: &AtrocityFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(ref state) = filter.state {
        condition = condition.add(atrocity::Column::State.eq(state.as_str()));
    }
    if let Some(ref district) = filter.district {
        condition = condition.add(atrocity::Column::District.eq(district.as_str()));
    }
    if let Some(verified) = filter.verified {
        condition = condition.add(atrocity::Column::IsVerified.eq(verified));
    }
    if let Some(ref search) = filter.search {
        condition = condition.add(
            Condition::any()
                .add(atrocity::Column::Title.contains(search.as_str()))
                .add(atrocity::Column::Description.contains(search.as_str())),
        );
    }

    condition
}

impl SeaOrmStorage {
    pub async fn insert_atrocity(&self, draft: AtrocityDraft) -> Result<Atrocity> {
        let now = Utc::now();
        let row = atrocity::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            title: Set(draft.title),
            state: Set(draft.state),
            district: Set(draft.district),
            locality: Set(draft.locality),
            description: Set(draft.description),
            images: Set(encode_images(&draft.images)),
            occurred_at: Set(draft.occurred_at),
            is_verified: Set(false),
            reported_by: Set(draft.reported_by),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let model = row.insert(&self.db).await?;
        info!("Atrocity report created: {}", model.id);
        Ok(model_to_atrocity(model))
    }

    pub async fn find_atrocity(&self, id: &str) -> Result<Option<Atrocity>> {
        let model = atrocity::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_atrocity))
    }

    /// 最新创建的排在前面
    pub async fn list_atrocities(
        &self,
        filter: &AtrocityFilter,
        page: Page,
    ) -> Result<(Vec<Atrocity>, u64)> {
        let condition = filter_condition(filter);

        let total = atrocity::Entity::find()
            .filter(condition.clone())
            .count(&self.db)
            .await?;

        let models = atrocity::Entity::find()
            .filter(condition)
            .order_by_desc(atrocity::Column::CreatedAt)
            .order_by_asc(atrocity::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;

        Ok((models.into_iter().map(model_to_atrocity).collect(), total))
    }

    pub async fn update_atrocity(&self, id: &str, changes: AtrocityChanges) -> Result<Atrocity> {
        let model = self.require_atrocity_model(id).await?;
        let mut active: atrocity::ActiveModel = model.into();

        if let Some(title) = changes.title {
            active.title = Set(title);
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
        if let Some(description) = changes.description {
            active.description = Set(description);
        }
        if let Some(images) = changes.images {
            active.images = Set(encode_images(&images));
        }
        if let Some(occurred_at) = changes.occurred_at {
            active.occurred_at = Set(occurred_at);
        }
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(model_to_atrocity(model))
    }

    pub async fn set_atrocity_verified(&self, id: &str, verified: bool) -> Result<Atrocity> {
        let model = self.require_atrocity_model(id).await?;
        let mut active: atrocity::ActiveModel = model.into();
        active.is_verified = Set(verified);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_atrocity(model))
    }

    pub async fn delete_atrocity(&self, id: &str) -> Result<bool> {
        let result = atrocity::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count_atrocities(&self) -> Result<u64> {
        Ok(atrocity::Entity::find().count(&self.db).await?)
    }

    async fn require_atrocity_model(&self, id: &str) -> Result<atrocity::Model> {
        atrocity::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| CivicError::not_found(format!("atrocity '{}' not found", id)))
    }
}
