//! HTTP 端点集成测试：/api/auth、/graphql、/health

use std::sync::Arc;
use std::time::Duration;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use civicwatch::api::graphql::{VisitorRateLimiter, build_schema};
use civicwatch::api::jwt::JwtService;
use civicwatch::api::services::{
    AppStartTime, auth_governor_config, auth_routes, graphql_routes, health_routes,
    json_error_handler,
};
use civicwatch::config::{DatabaseConfig, RateLimitConfig};
use civicwatch::services::AppServices;
use civicwatch::storage::{Role, SeaOrmStorage};

// =============================================================================
// Test Setup
// =============================================================================

async fn create_storage(dir: &TempDir) -> Arc<SeaOrmStorage> {
    let db_url = format!("sqlite://{}", dir.path().join("http.db").display());
    Arc::new(
        SeaOrmStorage::connect(&db_url, "sqlite", &DatabaseConfig::default())
            .await
            .expect("连接 SQLite 失败"),
    )
}

macro_rules! init_app {
    ($storage:expr, $auth_burst:expr) => {{
        let storage: Arc<SeaOrmStorage> = $storage;
        let services = AppServices::new(storage.clone());
        let limiter = Arc::new(VisitorRateLimiter::new(Duration::from_secs(60), 1));
        let schema = build_schema(services.clone(), limiter);
        let governor = auth_governor_config(&RateLimitConfig {
            auth_seconds_per_request: 60,
            auth_burst: $auth_burst,
            ..Default::default()
        })
        .expect("valid governor config");

        test::init_service(
            App::new()
                .app_data(web::Data::new(schema))
                .app_data(web::Data::new(services))
                .app_data(web::Data::new(JwtService::new("test-secret", 30)))
                .app_data(web::Data::new(storage))
                .app_data(web::Data::new(AppStartTime::now()))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .service(graphql_routes(false))
                .service(auth_routes(&governor))
                .service(health_routes()),
        )
        .await
    }};
}

fn peer() -> std::net::SocketAddr {
    "203.0.113.9:40000".parse().unwrap()
}

// =============================================================================
// Auth endpoints
// =============================================================================

#[actix_web::test]
async fn test_register_then_login() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(create_storage(&dir).await, 10);

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .peer_addr(peer())
        .set_json(json!({ "name": "Asha", "email": "asha@example.org", "password": "long enough secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["user"]["role"], "user");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["data"]["expires_in"], 30 * 60);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "email": "asha@example.org", "password": "long enough secret" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["user"]["email"], "asha@example.org");
}

#[actix_web::test]
async fn test_duplicate_registration_conflicts() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(create_storage(&dir).await, 10);

    let payload = json!({ "name": "A", "email": "dup@example.org", "password": "long enough secret" });
    let first = TestRequest::post()
        .uri("/api/auth/register")
        .peer_addr(peer())
        .set_json(&payload)
        .to_request();
    assert_eq!(test::call_service(&app, first).await.status(), StatusCode::CREATED);

    let second = TestRequest::post()
        .uri("/api/auth/register")
        .peer_addr(peer())
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, second).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1009);
}

#[actix_web::test]
async fn test_bad_credentials_unauthorized() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(create_storage(&dir).await, 10);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(peer())
        .set_json(json!({ "email": "ghost@example.org", "password": "whatever123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_malformed_json_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(create_storage(&dir).await, 10);

    let req = TestRequest::post()
        .uri("/api/auth/login")
        .peer_addr(peer())
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
}

#[actix_web::test]
async fn test_login_is_rate_limited() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(create_storage(&dir).await, 2);

    let mut statuses = Vec::new();
    for _ in 0..3 {
        let req = TestRequest::post()
            .uri("/api/auth/login")
            .peer_addr(peer())
            .set_json(json!({ "email": "ghost@example.org", "password": "whatever123" }))
            .to_request();
        statuses.push(test::call_service(&app, req).await.status());
    }
    assert_eq!(statuses[0], StatusCode::UNAUTHORIZED);
    assert_eq!(statuses[1], StatusCode::UNAUTHORIZED);
    assert_eq!(statuses[2], StatusCode::TOO_MANY_REQUESTS);
}

// =============================================================================
// GraphQL over HTTP
// =============================================================================

#[actix_web::test]
async fn test_graphql_bearer_token_resolves_viewer() {
    let dir = TempDir::new().unwrap();
    let storage = create_storage(&dir).await;
    let app = init_app!(storage.clone(), 10);

    let req = TestRequest::post()
        .uri("/api/auth/register")
        .peer_addr(peer())
        .set_json(json!({ "name": "Mod", "email": "mod@example.org", "password": "long enough secret" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let user_id = body["data"]["user"]["id"].as_str().unwrap().to_string();

    // 角色变化在下一次请求立即生效
    storage.update_user_role(&user_id, Role::Moderator).await.unwrap();

    let req = TestRequest::post()
        .uri("/graphql")
        .peer_addr(peer())
        .insert_header(("Authorization", format!("Bearer {}", token)))
        .set_json(json!({ "query": "{ me { email role } }" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["data"]["me"]["email"], "mod@example.org");
    assert_eq!(body["data"]["me"]["role"], "MODERATOR");

    let req = TestRequest::post()
        .uri("/graphql")
        .peer_addr(peer())
        .insert_header(("Authorization", "Bearer not-a-token"))
        .set_json(json!({ "query": "{ me { email } }" }))
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(body["data"]["me"].is_null());
}

#[actix_web::test]
async fn test_graphql_visitor_limit_keyed_by_client_ip() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(create_storage(&dir).await, 10);
    let mutation = json!({ "query": "mutation { incrementVisitorCount { totalVisitors } }" });

    let call = |addr: &str| {
        TestRequest::post()
            .uri("/graphql")
            .peer_addr(addr.parse().unwrap())
            .set_json(&mutation)
            .to_request()
    };

    let body: Value = test::read_body_json(test::call_service(&app, call("203.0.113.20:1000")).await).await;
    assert_eq!(body["data"]["incrementVisitorCount"]["totalVisitors"], 1);

    let body: Value = test::read_body_json(test::call_service(&app, call("203.0.113.20:2000")).await).await;
    assert_eq!(body["errors"][0]["extensions"]["code"], "RATE_LIMITED");

    let body: Value = test::read_body_json(test::call_service(&app, call("203.0.113.21:1000")).await).await;
    assert_eq!(body["data"]["incrementVisitorCount"]["totalVisitors"], 2);
}

#[actix_web::test]
async fn test_playground_disabled() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(create_storage(&dir).await, 10);

    let req = TestRequest::get().uri("/graphql").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Health
// =============================================================================

#[actix_web::test]
async fn test_health_endpoints() {
    let dir = TempDir::new().unwrap();
    let app = init_app!(create_storage(&dir).await, 10);

    let resp = test::call_service(&app, TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage"]["backend"], "sqlite");

    let resp = test::call_service(&app, TestRequest::get().uri("/health/ready").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, TestRequest::get().uri("/health/live").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
