//! StatsService tests
//!
//! 访客计数：延迟创建、单行不变量、并发自增不丢失。

use std::sync::Arc;

use migration::entities::visitor_stats;
use sea_orm::{EntityTrait, PaginatorTrait};
use tempfile::TempDir;

use civicwatch::config::DatabaseConfig;
use civicwatch::services::StatsService;
use civicwatch::storage::SeaOrmStorage;

// =============================================================================
// Test Setup
// =============================================================================

async fn create_storage() -> (TempDir, Arc<SeaOrmStorage>) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!("sqlite://{}", temp_dir.path().join("stats.db").display());
    let storage = SeaOrmStorage::connect(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("连接 SQLite 失败");
    (temp_dir, Arc::new(storage))
}

async fn row_count(storage: &SeaOrmStorage) -> u64 {
    visitor_stats::Entity::find()
        .count(storage.get_db())
        .await
        .expect("count failed")
}

// =============================================================================
// Accessor
// =============================================================================

#[tokio::test]
async fn test_get_stats_creates_zero_record() {
    let (_dir, storage) = create_storage().await;
    let service = StatsService::new(storage.clone());

    assert_eq!(row_count(&storage).await, 0);

    let stats = service.get_stats().await.unwrap();
    assert_eq!(stats.total_visitors, 0);
    assert!(!stats.id.is_empty());
    assert_eq!(row_count(&storage).await, 1);
}

#[tokio::test]
async fn test_get_stats_is_stable() {
    let (_dir, storage) = create_storage().await;
    let service = StatsService::new(storage.clone());

    let first = service.get_stats().await.unwrap();
    let second = service.get_stats().await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.total_visitors, second.total_visitors);
    assert_eq!(row_count(&storage).await, 1);
}

#[tokio::test]
async fn test_concurrent_first_access_creates_one_row() {
    let (_dir, storage) = create_storage().await;
    let service = Arc::new(StatsService::new(storage.clone()));

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.get_stats().await })
        })
        .collect();

    let mut ids = Vec::new();
    for handle in handles {
        let stats = handle.await.unwrap().unwrap();
        assert_eq!(stats.total_visitors, 0);
        ids.push(stats.id);
    }

    ids.dedup();
    assert_eq!(ids.len(), 1);
    assert_eq!(row_count(&storage).await, 1);
}

// =============================================================================
// Incrementer
// =============================================================================

#[tokio::test]
async fn test_increment_from_fresh_database() {
    let (_dir, storage) = create_storage().await;
    let service = StatsService::new(storage.clone());

    let stats = service.increment_stats().await.unwrap();
    assert_eq!(stats.total_visitors, 1);
    assert_eq!(row_count(&storage).await, 1);

    let stats = service.increment_stats().await.unwrap();
    assert_eq!(stats.total_visitors, 2);
}

#[tokio::test]
async fn test_increment_advances_updated_at() {
    let (_dir, storage) = create_storage().await;
    let service = StatsService::new(storage);

    let before = service.get_stats().await.unwrap();
    let after = service.increment_stats().await.unwrap();
    assert_eq!(after.id, before.id);
    assert!(after.updated_at >= before.updated_at);
}

#[tokio::test]
async fn test_concurrent_increments_are_not_lost() {
    let (_dir, storage) = create_storage().await;
    let service = Arc::new(StatsService::new(storage.clone()));

    let start = service.get_stats().await.unwrap().total_visitors;

    const N: i64 = 20;
    let handles: Vec<_> = (0..N)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.increment_stats().await })
        })
        .collect();

    let mut seen = Vec::new();
    for handle in handles {
        let stats = handle.await.unwrap().unwrap();
        seen.push(stats.total_visitors);
    }

    let final_stats = service.get_stats().await.unwrap();
    assert_eq!(final_stats.total_visitors, start + N);

    // 每次自增都读到自己写入后的值
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen.len(), N as usize);
    assert_eq!(row_count(&storage).await, 1);
}

#[tokio::test]
async fn test_counter_survives_reconnect() {
    let temp_dir = TempDir::new().unwrap();
    let db_url = format!("sqlite://{}", temp_dir.path().join("persist.db").display());

    {
        let storage = SeaOrmStorage::connect(&db_url, "sqlite", &DatabaseConfig::default())
            .await
            .unwrap();
        let service = StatsService::new(Arc::new(storage));
        service.increment_stats().await.unwrap();
        service.increment_stats().await.unwrap();
    }

    let storage = SeaOrmStorage::connect(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .unwrap();
    let service = StatsService::new(Arc::new(storage));
    assert_eq!(service.get_stats().await.unwrap().total_visitors, 2);
}
