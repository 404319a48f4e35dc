//! SeaORM storage backend
//!
//! One `SeaOrmStorage` serves every entity; the per-entity operations live in
//! sibling modules as additional `impl SeaOrmStorage` blocks.
//! Supported databases: SQLite, MySQL/MariaDB and PostgreSQL.

mod atrocities;
mod connection;
mod converters;
mod governance;
pub mod retry;
mod stats;
mod users;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{CivicError, Result};

use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://")
    {
        Ok("postgres".to_string())
    } else {
        Err(CivicError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 只有文件路径时补全 `sqlite://` 前缀
fn normalize_sqlite_url(database_url: &str) -> String {
    if database_url.starts_with("sqlite:") {
        database_url.to_string()
    } else {
        format!("sqlite://{}", database_url)
    }
}

/// 存储后端的描述信息（健康检查用）
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageInfo {
    pub backend: String,
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// 连接数据库并运行迁移
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        let config = crate::config::get_config();
        Self::connect(database_url, backend_name, &config.database).await
    }

    /// 使用显式的数据库配置连接（CLI 与测试使用）
    pub async fn connect(
        database_url: &str,
        backend_name: &str,
        config: &DatabaseConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(CivicError::database_config("database_url 未设置"));
        }

        let db = match backend_name {
            "sqlite" => connect_sqlite(&normalize_sqlite_url(database_url), config).await?,
            "mysql" | "mariadb" | "postgres" => {
                connect_generic(database_url, backend_name, config).await?
            }
            other => {
                return Err(CivicError::database_config(format!(
                    "不支持的数据库类型: {}",
                    other
                )));
            }
        };

        let storage = SeaOrmStorage {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        };

        run_migrations(&storage.db).await?;

        info!("{} storage initialized", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    pub fn get_backend_config(&self) -> StorageInfo {
        StorageInfo {
            backend: self.backend_name.clone(),
        }
    }

    /// 检查数据库连接是否可用
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| CivicError::database_connection(e.to_string()))
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub(crate) fn retry_config(&self) -> retry::RetryConfig {
        self.retry_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://data.db").ok().as_deref(), Some("sqlite"));
        assert_eq!(infer_backend_from_url("sqlite::memory:").ok().as_deref(), Some("sqlite"));
        assert_eq!(infer_backend_from_url("./civic.db").ok().as_deref(), Some("sqlite"));
        assert_eq!(infer_backend_from_url("mariadb://u@h/db").ok().as_deref(), Some("mysql"));
        assert_eq!(
            infer_backend_from_url("postgresql://u@h/db").ok().as_deref(),
            Some("postgres")
        );
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }

    #[test]
    fn test_normalize_sqlite_url() {
        assert_eq!(normalize_sqlite_url("data/civic.db"), "sqlite://data/civic.db");
        assert_eq!(normalize_sqlite_url("sqlite::memory:"), "sqlite::memory:");
    }
}
