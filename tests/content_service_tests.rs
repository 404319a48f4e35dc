//! AtrocityService / GovernanceService / UserService tests

use std::sync::Arc;

use tempfile::TempDir;

use civicwatch::config::DatabaseConfig;
use civicwatch::errors::CivicError;
use civicwatch::services::{
    AppServices, CreateAtrocityRequest, CreateHighlightRequest, UpdateAtrocityRequest,
    UpdateHighlightRequest,
};
use civicwatch::storage::{
    AtrocityFilter, HighlightCategory, HighlightFilter, HighlightStatus, Page, Role, SeaOrmStorage,
};

// =============================================================================
// Test Setup
// =============================================================================

async fn create_services() -> (TempDir, AppServices) {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!("sqlite://{}", temp_dir.path().join("content.db").display());
    let storage = SeaOrmStorage::connect(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("连接 SQLite 失败");
    (temp_dir, AppServices::new(Arc::new(storage)))
}

fn report(title: &str, state: &str, district: Option<&str>) -> CreateAtrocityRequest {
    CreateAtrocityRequest {
        title: title.to_string(),
        state: state.to_string(),
        district: district.map(str::to_string),
        description: format!("{} details", title),
        ..Default::default()
    }
}

fn highlight(title: &str, category: HighlightCategory, visible: bool) -> CreateHighlightRequest {
    CreateHighlightRequest {
        title: title.to_string(),
        category,
        state: "Kerala".to_string(),
        district: None,
        locality: None,
        status: HighlightStatus::Proposed,
        description: "description".to_string(),
        source_name: None,
        source_url: None,
        published_at: None,
        is_visible: visible,
    }
}

// =============================================================================
// Atrocity reports
// =============================================================================

#[tokio::test]
async fn test_create_trims_and_defaults() {
    let (_dir, services) = create_services().await;

    let created = services
        .atrocities
        .create(
            CreateAtrocityRequest {
                title: "  Padded title  ".to_string(),
                state: "Bihar".to_string(),
                district: Some("   ".to_string()),
                description: "desc".to_string(),
                images: vec!["https://img.example.org/1.jpg".to_string()],
                ..Default::default()
            },
            None,
        )
        .await
        .unwrap();

    assert_eq!(created.title, "Padded title");
    assert_eq!(created.district, None);
    assert!(!created.is_verified);
    assert_eq!(created.images.len(), 1);

    let fetched = services.atrocities.get(&created.id).await.unwrap();
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.title, created.title);
    assert_eq!(fetched.images, created.images);
}

#[tokio::test]
async fn test_create_rejects_bad_image_url() {
    let (_dir, services) = create_services().await;

    let result = services
        .atrocities
        .create(
            CreateAtrocityRequest {
                images: vec!["ftp://files.example.org/a.png".to_string()],
                ..report("Title", "Bihar", None)
            },
            None,
        )
        .await;
    assert!(matches!(result, Err(CivicError::Validation(_))));
}

#[tokio::test]
async fn test_list_filters_and_pagination() {
    let (_dir, services) = create_services().await;

    services.atrocities.create(report("Flooded village", "Assam", Some("Dhubri")), None).await.unwrap();
    services.atrocities.create(report("Police excess", "Assam", Some("Cachar")), None).await.unwrap();
    services.atrocities.create(report("Wage theft", "Bihar", None), None).await.unwrap();

    let assam = services
        .atrocities
        .list(
            AtrocityFilter {
                state: Some("Assam".to_string()),
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(assam.total, 2);

    let search = services
        .atrocities
        .list(
            AtrocityFilter {
                search: Some("wage".to_string()),
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(search.total, 1);
    assert_eq!(search.items[0].title, "Wage theft");

    let first_page = services
        .atrocities
        .list(AtrocityFilter::default(), Page::new(Some(2), Some(0)))
        .await
        .unwrap();
    assert_eq!(first_page.total, 3);
    assert_eq!(first_page.items.len(), 2);

    let second_page = services
        .atrocities
        .list(AtrocityFilter::default(), Page::new(Some(2), Some(2)))
        .await
        .unwrap();
    assert_eq!(second_page.items.len(), 1);
    assert!(first_page.items.iter().all(|a| a.id != second_page.items[0].id));
}

#[tokio::test]
async fn test_update_is_partial() {
    let (_dir, services) = create_services().await;
    let created = services
        .atrocities
        .create(report("Original", "Goa", Some("North Goa")), None)
        .await
        .unwrap();

    let updated = services
        .atrocities
        .update(
            &created.id,
            UpdateAtrocityRequest {
                title: Some("Renamed".to_string()),
                district: Some(None),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.title, "Renamed");
    assert_eq!(updated.district, None);
    assert_eq!(updated.state, "Goa");
    assert_eq!(updated.description, created.description);
    assert!(updated.updated_at >= created.updated_at);
}

#[tokio::test]
async fn test_missing_report_is_not_found() {
    let (_dir, services) = create_services().await;

    assert!(matches!(
        services.atrocities.get("missing").await,
        Err(CivicError::NotFound(_))
    ));
    assert!(matches!(
        services.atrocities.delete("missing").await,
        Err(CivicError::NotFound(_))
    ));
    assert!(matches!(
        services.atrocities.set_verified("missing", true).await,
        Err(CivicError::NotFound(_))
    ));
}

// =============================================================================
// Governance highlights
// =============================================================================

#[tokio::test]
async fn test_hidden_highlight_filtering() {
    let (_dir, services) = create_services().await;

    let public = services
        .governance
        .create(highlight("School midday meals", HighlightCategory::Education, true))
        .await
        .unwrap();
    let hidden = services
        .governance
        .create(highlight("Unannounced scheme", HighlightCategory::Welfare, false))
        .await
        .unwrap();

    let visible_only = services
        .governance
        .list(HighlightFilter::default(), Page::default())
        .await
        .unwrap();
    assert_eq!(visible_only.total, 1);
    assert_eq!(visible_only.items[0].id, public.id);

    let all = services
        .governance
        .list(
            HighlightFilter {
                include_hidden: true,
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(all.total, 2);

    assert!(matches!(
        services.governance.get(&hidden.id, false).await,
        Err(CivicError::NotFound(_))
    ));
    assert!(services.governance.get(&hidden.id, true).await.is_ok());

    let by_category = services
        .governance
        .list(
            HighlightFilter {
                category: Some(HighlightCategory::Education),
                include_hidden: true,
                ..Default::default()
            },
            Page::default(),
        )
        .await
        .unwrap();
    assert_eq!(by_category.total, 1);
}

#[tokio::test]
async fn test_highlight_update_and_verify() {
    let (_dir, services) = create_services().await;
    let created = services
        .governance
        .create(highlight("Solar pumps", HighlightCategory::Environment, true))
        .await
        .unwrap();

    let updated = services
        .governance
        .update(
            &created.id,
            UpdateHighlightRequest {
                status: Some(HighlightStatus::Stalled),
                source_url: Some(Some("https://gov.example.org/solar".to_string())),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, HighlightStatus::Stalled);
    assert_eq!(
        updated.source_url.as_deref(),
        Some("https://gov.example.org/solar")
    );

    let verified = services.governance.set_verified(&created.id, true).await.unwrap();
    assert!(verified.is_verified);

    services.governance.delete(&created.id).await.unwrap();
    assert_eq!(services.governance.count().await.unwrap(), 0);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_register_and_authenticate() {
    let (_dir, services) = create_services().await;

    let user = services
        .users
        .register("Asha", "Asha@Example.org", "long enough secret")
        .await
        .unwrap();
    assert_eq!(user.email, "asha@example.org");
    assert_eq!(user.role, Role::User);
    assert!(!user.is_verified);

    let logged_in = services
        .users
        .authenticate("asha@example.org", "long enough secret")
        .await
        .unwrap();
    assert_eq!(logged_in.id, user.id);

    assert!(matches!(
        services.users.authenticate("asha@example.org", "wrong password").await,
        Err(CivicError::Unauthorized(_))
    ));
    assert!(matches!(
        services.users.authenticate("nobody@example.org", "long enough secret").await,
        Err(CivicError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let (_dir, services) = create_services().await;

    services
        .users
        .register("A", "dup@example.org", "long enough secret")
        .await
        .unwrap();
    let result = services
        .users
        .register("B", "DUP@example.org", "another secret")
        .await;
    assert!(matches!(result, Err(CivicError::Conflict(_))));
}

#[tokio::test]
async fn test_weak_password_rejected() {
    let (_dir, services) = create_services().await;
    let result = services.users.register("A", "a@example.org", "short").await;
    assert!(matches!(result, Err(CivicError::Validation(_))));
}

#[tokio::test]
async fn test_create_admin_promotes_existing_account() {
    let (_dir, services) = create_services().await;

    let (admin, created) = services
        .users
        .create_admin("Root", "root@example.org", "admin password")
        .await
        .unwrap();
    assert!(created);
    assert_eq!(admin.role, Role::Admin);
    assert!(admin.is_verified);

    services
        .users
        .register("Mod", "mod@example.org", "first password")
        .await
        .unwrap();
    let (promoted, created) = services
        .users
        .create_admin("Mod", "mod@example.org", "second password")
        .await
        .unwrap();
    assert!(!created);
    assert_eq!(promoted.role, Role::Admin);
    assert!(promoted.is_verified);

    // 密码已重置
    assert!(services.users.authenticate("mod@example.org", "second password").await.is_ok());
    assert_eq!(services.users.count_with_role(Role::Admin).await.unwrap(), 2);
}

#[tokio::test]
async fn test_promote_missing_user_is_not_found() {
    let temp_dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!("sqlite://{}", temp_dir.path().join("promote.db").display());
    let storage = SeaOrmStorage::connect(&db_url, "sqlite", &DatabaseConfig::default())
        .await
        .expect("连接 SQLite 失败");

    let result = storage
        .promote_user_to_admin("missing", "hash".to_string())
        .await;
    assert!(matches!(result, Err(CivicError::NotFound(_))));
}

#[tokio::test]
async fn test_promotion_updates_account_in_place() {
    let (_dir, services) = create_services().await;
    let user = services
        .users
        .register("Mod", "mod@example.org", "first password")
        .await
        .unwrap();

    let (promoted, _) = services
        .users
        .create_admin("Mod", "mod@example.org", "second password")
        .await
        .unwrap();
    assert_eq!(promoted.id, user.id);

    let stored = services.users.get(&user.id).await.unwrap();
    assert_eq!(stored.role, Role::Admin);
    assert!(stored.is_verified);
    assert!(services.users.authenticate("mod@example.org", "first password").await.is_err());
    assert_eq!(services.users.count_with_role(Role::Admin).await.unwrap(), 1);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let (_dir, services) = create_services().await;
    let (admin, _) = services
        .users
        .create_admin("Root", "root@example.org", "admin password")
        .await
        .unwrap();

    assert!(matches!(
        services.users.delete(&admin.id, &admin.id).await,
        Err(CivicError::Forbidden(_))
    ));

    let other = services
        .users
        .register("Temp", "temp@example.org", "temporary pass")
        .await
        .unwrap();
    services.users.delete(&admin.id, &other.id).await.unwrap();
    assert!(matches!(
        services.users.get(&other.id).await,
        Err(CivicError::NotFound(_))
    ));
}
