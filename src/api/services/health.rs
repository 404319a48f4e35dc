use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, web};
use tracing::{error, trace};

use crate::storage::SeaOrmStorage;

use super::helpers::json_response;
use super::types::{ErrorCode, HealthResponse, HealthStorageCheck};

const STORAGE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// 应用启动时间
#[derive(Clone, Debug)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

impl AppStartTime {
    pub fn now() -> Self {
        Self {
            start_datetime: chrono::Utc::now(),
        }
    }
}

/// 探测数据库连接（带超时）
async fn check_storage(storage: &SeaOrmStorage) -> HealthStorageCheck {
    let backend = storage.get_backend_config().backend;
    match tokio::time::timeout(STORAGE_CHECK_TIMEOUT, storage.ping()).await {
        Ok(Ok(())) => HealthStorageCheck {
            status: "healthy".to_string(),
            backend,
            error: None,
        },
        Ok(Err(e)) => {
            error!("Storage health check failed: {}", e);
            HealthStorageCheck {
                status: "unhealthy".to_string(),
                backend,
                error: Some("database unreachable".to_string()),
            }
        }
        Err(_) => {
            error!("Storage health check timeout");
            HealthStorageCheck {
                status: "unhealthy".to_string(),
                backend,
                error: Some("timeout".to_string()),
            }
        }
    }
}

/// Health Service
///
/// 直接访问 storage，不经过业务 service。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(
        storage: web::Data<Arc<SeaOrmStorage>>,
        app_start_time: web::Data<AppStartTime>,
    ) -> impl Responder {
        let start = Instant::now();
        trace!("Received health check request");

        let storage_check = check_storage(&storage).await;
        let healthy = storage_check.status == "healthy";
        let now = chrono::Utc::now();

        let body = HealthResponse {
            status: storage_check.status.clone(),
            timestamp: now.to_rfc3339(),
            uptime: (now - app_start_time.start_datetime).num_seconds().max(0) as u64,
            storage: storage_check,
            response_time_ms: start.elapsed().as_millis() as u64,
        };

        if healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(body))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(body),
            )
        }
    }

    /// 就绪检查：数据库可用才返回 200
    pub async fn readiness_check(storage: web::Data<Arc<SeaOrmStorage>>) -> impl Responder {
        trace!("Received readiness check request");

        match tokio::time::timeout(STORAGE_CHECK_TIMEOUT, storage.ping()).await {
            Ok(Ok(())) => HttpResponse::Ok().content_type("text/plain").body("OK"),
            _ => HttpResponse::ServiceUnavailable()
                .content_type("text/plain")
                .body("NOT READY"),
        }
    }

    /// 存活检查：进程能响应即可
    pub async fn liveness_check() -> impl Responder {
        trace!("Received liveness check request");
        HttpResponse::NoContent().finish()
    }
}

/// Health 路由 `/health`
pub fn health_routes() -> actix_web::Scope {
    web::scope("/health")
        .route("", web::get().to(HealthService::health_check))
        .route("", web::head().to(HealthService::health_check))
        .route("/ready", web::get().to(HealthService::readiness_check))
        .route("/ready", web::head().to(HealthService::readiness_check))
        .route("/live", web::get().to(HealthService::liveness_check))
        .route("/live", web::head().to(HealthService::liveness_check))
}
