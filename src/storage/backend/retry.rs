//! 数据库写入重试
//!
//! 幂等写入（首行创建等）遇到瞬时错误时整体重放。
//! 非幂等写入（计数器自增）只在确定已回滚的错误上重放，见
//! [`is_rollback_safe_error`]。

use std::future::Future;
use std::time::Duration;

use sea_orm::DbErr;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// 重试策略
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(config: &DatabaseConfig) -> Self {
        Self {
            max_retries: config.retry_count,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms.max(config.retry_base_delay_ms),
        }
    }
}

/// 数据库错误是否属于瞬时错误
pub fn is_retryable_error(err: &DbErr) -> bool {
    matches!(err, DbErr::Conn(_)) || is_rollback_safe_error(err)
}

/// 出错时写入一定没有生效的瞬时错误
///
/// 连接中断（`DbErr::Conn`）不在其中：COMMIT 可能已在服务端完成，
/// 重放会让非幂等写入执行两次。
pub fn is_rollback_safe_error(err: &DbErr) -> bool {
    match err {
        DbErr::ConnectionAcquire(_) => true,
        DbErr::Exec(runtime_err) | DbErr::Query(runtime_err) => is_transient(runtime_err),
        _ => false,
    }
}

fn is_transient(err: &sea_orm::error::RuntimeErr) -> bool {
    use sea_orm::error::RuntimeErr;

    match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            if let Some(code) = sqlx_err.as_database_error().and_then(|e| e.code()) {
                return matches!(
                    code.as_ref(),
                    // MySQL: 死锁 / 锁等待超时
                    "1213" | "1205"
                    // PostgreSQL: 序列化失败 / 死锁
                    | "40001" | "40P01"
                    // SQLite: BUSY / LOCKED
                    | "5" | "6"
                );
            }
            message_looks_transient(&sqlx_err.to_string())
        }
        RuntimeErr::Internal(msg) => message_looks_transient(msg),
        #[allow(unreachable_patterns)]
        _ => false,
    }
}

fn message_looks_transient(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    ["deadlock", "lock wait timeout", "database is locked", "serialization failure"]
        .iter()
        .any(|needle| msg.contains(needle))
}

/// 执行 `operation`，瞬时错误按指数退避重放
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    with_retry_if(operation_name, config, is_retryable_error, operation).await
}

/// 同 [`with_retry`]，由 `retryable` 决定哪些错误可以重放
pub async fn with_retry_if<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    retryable: fn(&DbErr) -> bool,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!("'{}' succeeded after {} retries", operation_name, attempt);
                }
                return Ok(value);
            }
            Err(e) if attempt < config.max_retries && retryable(&e) => {
                attempt += 1;
                let delay = backoff_delay(attempt, config);
                warn!(
                    "'{}' failed (attempt {}/{}): {}; retrying in {} ms",
                    operation_name,
                    attempt,
                    config.max_retries + 1,
                    e,
                    delay
                );
                sleep(Duration::from_millis(delay)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// base * 2^(attempt-1)，封顶 max，再加 0-25% 抖动
fn backoff_delay(attempt: u32, config: RetryConfig) -> u64 {
    use rand::RngExt;

    let exp = config
        .base_delay_ms
        .saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
    let capped = exp.min(config.max_delay_ms);
    capped.saturating_add(rand::rng().random_range(0..=capped / 4))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::error::{ConnAcquireErr, RuntimeErr};
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            base_delay_ms: 5,
            max_delay_ms: 20,
        }
    }

    #[test]
    fn test_classifies_transient_errors() {
        assert!(is_retryable_error(&DbErr::ConnectionAcquire(
            ConnAcquireErr::Timeout
        )));
        assert!(is_retryable_error(&DbErr::Exec(RuntimeErr::Internal(
            "database is locked".into()
        ))));
        assert!(is_retryable_error(&DbErr::Query(RuntimeErr::Internal(
            "Deadlock found when trying to get lock".into()
        ))));
        assert!(is_retryable_error(&DbErr::Conn(RuntimeErr::Internal(
            "connection reset by peer".into()
        ))));
        assert!(!is_retryable_error(&DbErr::RecordNotFound("x".into())));
        assert!(!is_retryable_error(&DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: users.email".into()
        ))));
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let config = RetryConfig::default();
        assert!((100..=125).contains(&backoff_delay(1, config)));
        assert!((400..=500).contains(&backoff_delay(3, config)));
        assert!((2000..=2500).contains(&backoff_delay(12, config)));
    }

    #[test]
    fn test_from_database_config() {
        let db = DatabaseConfig {
            retry_count: 5,
            retry_base_delay_ms: 300,
            retry_max_delay_ms: 100,
            ..Default::default()
        };
        let config = RetryConfig::from(&db);
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.max_delay_ms, 300);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let calls = AtomicU32::new(0);
        let result = with_retry("flaky", fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.ok(), Some(2));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result = with_retry("always_busy", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(DbErr::Exec(RuntimeErr::Internal("database is locked".into()))) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let calls = AtomicU32::new(0);
        let result = with_retry("missing", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(DbErr::RecordNotFound("gone".into())) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_rollback_safe_excludes_dropped_connection() {
        assert!(is_rollback_safe_error(&DbErr::ConnectionAcquire(
            ConnAcquireErr::Timeout
        )));
        assert!(is_rollback_safe_error(&DbErr::Exec(RuntimeErr::Internal(
            "database is locked".into()
        ))));
        assert!(is_rollback_safe_error(&DbErr::Query(RuntimeErr::Internal(
            "could not serialize access due to concurrent update: serialization failure".into()
        ))));
        assert!(!is_rollback_safe_error(&DbErr::Conn(RuntimeErr::Internal(
            "connection closed".into()
        ))));
    }

    #[tokio::test]
    async fn test_dropped_connection_not_replayed_for_rollback_safe_policy() {
        let calls = AtomicU32::new(0);
        let result = with_retry_if("increment", fast(), is_rollback_safe_error, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {
                Err::<(), _>(DbErr::Conn(RuntimeErr::Internal(
                    "connection reset while committing".into(),
                )))
            }
        })
        .await;

        assert!(matches!(result, Err(DbErr::Conn(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_rollback_safe_policy_still_retries_busy() {
        let calls = AtomicU32::new(0);
        let result = with_retry_if("increment", fast(), is_rollback_safe_error, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DbErr::Exec(RuntimeErr::Internal("database is locked".into())))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.ok(), Some(1));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
