//! visitor_stats 表：单行全局计数器
//!
//! scope 列带唯一索引，保证并发的首次创建最终只留下一行。

use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ActiveValue::Set, EntityTrait, ExprTrait, QueryFilter, TransactionTrait};
use tracing::{debug, info};
use uuid::Uuid;

use super::SeaOrmStorage;
use super::converters::model_to_visitor_stats;
use super::retry;
use crate::errors::{CivicError, Result};
use crate::storage::models::VisitorStats;
use migration::entities::visitor_stats;

/// 唯一计数行的 scope 值
pub(crate) const GLOBAL_SCOPE: &str = "global";

/// 自增事务可重放的错误
const INCREMENT_RETRYABLE: fn(&sea_orm::DbErr) -> bool = retry::is_rollback_safe_error;

impl SeaOrmStorage {
    /// 读取全局计数行
    pub async fn find_visitor_stats(&self) -> Result<Option<VisitorStats>> {
        let model = visitor_stats::Entity::find()
            .filter(Expr::col(visitor_stats::Column::Scope).eq(GLOBAL_SCOPE))
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_visitor_stats))
    }

    /// 不存在时插入 total_visitors = 0 的计数行
    ///
    /// 与其他调用方竞争时，冲突的插入不产生新行。
    pub async fn insert_visitor_stats_if_absent(&self) -> Result<()> {
        let db = &self.db;
        retry::with_retry("insert_visitor_stats", self.retry_config(), || async move {
            let row = visitor_stats::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                scope: Set(GLOBAL_SCOPE.to_string()),
                total_visitors: Set(0),
                updated_at: Set(Utc::now()),
            };
            visitor_stats::Entity::insert(row)
                .on_conflict(
                    OnConflict::column(visitor_stats::Column::Scope)
                        .update_column(visitor_stats::Column::Scope)
                        .to_owned(),
                )
                .exec_without_returning(db)
                .await
        })
        .await?;

        debug!("Visitor stats row ensured");
        Ok(())
    }

    /// 在单个事务内把计数加一并读回
    ///
    /// 自增由数据库完成（`total_visitors = total_visitors + 1`），
    /// 并发调用不会丢失更新。自增不是幂等操作，只在确定已回滚的
    /// 错误上重放，连接中断直接返回错误。
    pub async fn increment_visitor_stats(&self, id: &str) -> Result<VisitorStats> {
        let db = &self.db;
        let model = retry::with_retry_if(
            "increment_visitor_stats",
            self.retry_config(),
            INCREMENT_RETRYABLE,
            || async move {
                let txn = db.begin().await?;

                let result = visitor_stats::Entity::update_many()
                    .col_expr(
                        visitor_stats::Column::TotalVisitors,
                        Expr::col(visitor_stats::Column::TotalVisitors).add(1),
                    )
                    .col_expr(visitor_stats::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(Expr::col(visitor_stats::Column::Id).eq(id))
                    .exec(&txn)
                    .await?;

                if result.rows_affected == 0 {
                    txn.rollback().await?;
                    return Ok::<_, sea_orm::DbErr>(None);
                }

                let model = visitor_stats::Entity::find_by_id(id.to_string())
                    .one(&txn)
                    .await?;
                txn.commit().await?;
                Ok(model)
            },
        )
        .await?;

        let stats = model
            .map(model_to_visitor_stats)
            .ok_or_else(|| CivicError::not_found(format!("visitor stats '{}' not found", id)))?;

        info!(total = stats.total_visitors, "Visitor count incremented");
        Ok(stats)
    }
}
