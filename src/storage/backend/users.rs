use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::model_to_user;
use crate::errors::{CivicError, Result};
use crate::storage::models::{NewUser, Page, Role, User, UserCredentials};
use migration::entities::user;

impl SeaOrmStorage {
    /// 插入新用户；email 冲突返回 Conflict
    pub async fn insert_user(&self, new_user: NewUser) -> Result<User> {
        let now = Utc::now();
        let row = user::ActiveModel {
            id: Set(Uuid::new_v4().to_string()),
            name: Set(new_user.name),
            email: Set(new_user.email.clone()),
            password_hash: Set(new_user.password_hash),
            role: Set(new_user.role.as_ref().to_string()),
            is_verified: Set(new_user.is_verified),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = row.insert(&self.db).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                CivicError::conflict(format!("email '{}' is already registered", new_user.email))
            } else {
                CivicError::from(e)
            }
        })?;

        info!("User created: {} ({})", model.id, model.role);
        Ok(model_to_user(model))
    }

    pub async fn find_user(&self, id: &str) -> Result<Option<User>> {
        let model = user::Entity::find_by_id(id.to_string()).one(&self.db).await?;
        Ok(model.map(model_to_user))
    }

    /// 按 email 查找用户及其密码哈希（email 需已规范化为小写）
    pub async fn find_user_credentials(&self, email: &str) -> Result<Option<UserCredentials>> {
        let model = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        Ok(model.map(|m| {
            let password_hash = m.password_hash.clone();
            UserCredentials {
                user: model_to_user(m),
                password_hash,
            }
        }))
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    /// 按创建时间倒序分页
    pub async fn list_users(&self, page: Page) -> Result<(Vec<User>, u64)> {
        let total = user::Entity::find().count(&self.db).await?;
        let models = user::Entity::find()
            .order_by_desc(user::Column::CreatedAt)
            .order_by_asc(user::Column::Id)
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?;
        Ok((models.into_iter().map(model_to_user).collect(), total))
    }

    pub async fn count_users_with_role(&self, role: Role) -> Result<u64> {
        Ok(user::Entity::find()
            .filter(user::Column::Role.eq(role.as_ref()))
            .count(&self.db)
            .await?)
    }

    pub async fn update_user_role(&self, id: &str, role: Role) -> Result<User> {
        let model = self.require_user_model(id).await?;
        let mut active: user::ActiveModel = model.into();
        active.role = Set(role.as_ref().to_string());
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_user(model))
    }

    pub async fn set_user_verified(&self, id: &str, verified: bool) -> Result<User> {
        let model = self.require_user_model(id).await?;
        let mut active: user::ActiveModel = model.into();
        active.is_verified = Set(verified);
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await?;
        Ok(model_to_user(model))
    }

    /// 在单个事务内重置密码、设为 admin 并标记已验证
    pub async fn promote_user_to_admin(&self, id: &str, password_hash: String) -> Result<User> {
        let txn = self.db.begin().await?;

        let Some(model) = user::Entity::find_by_id(id.to_string()).one(&txn).await? else {
            txn.rollback().await?;
            return Err(CivicError::not_found(format!("user '{}' not found", id)));
        };

        let mut active: user::ActiveModel = model.into();
        active.password_hash = Set(password_hash);
        active.role = Set(Role::Admin.as_ref().to_string());
        active.is_verified = Set(true);
        active.updated_at = Set(Utc::now());
        let model = active.update(&txn).await?;

        txn.commit().await?;
        Ok(model_to_user(model))
    }

    /// 删除用户，返回是否存在
    pub async fn delete_user(&self, id: &str) -> Result<bool> {
        let result = user::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn require_user_model(&self, id: &str) -> Result<user::Model> {
        user::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .ok_or_else(|| CivicError::not_found(format!("user '{}' not found", id)))
    }
}
