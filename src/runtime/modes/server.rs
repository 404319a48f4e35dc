//! Server mode
//!
//! Configures and starts the HTTP server: `/graphql`, `/api/auth/*` and
//! `/health/*`.

use std::sync::Arc;
use std::time::Duration;

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::graphql::VisitorRateLimiter;
use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{
    AppStartTime, auth_routes, graphql_routes, health_routes, json_error_handler,
};
use crate::config::{ApiConfig, get_config};
use crate::runtime::lifetime;

/// 访客限流器状态清理间隔
const LIMITER_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// JSON 请求体上限
const MAX_JSON_BODY_BYTES: usize = 256 * 1024;

/// 启动时检查 CORS 配置（只执行一次）
fn validate_cors_config(api: &ApiConfig) {
    if api.cors_allowed_origins.iter().any(|o| o == "*") {
        warn!("CORS allows any origin. Only use this for public, read-mostly deployments.");
    } else if !api.cors_allowed_origins.is_empty() {
        info!("CORS allowed origins: {:?}", api.cors_allowed_origins);
    }
}

fn build_cors_middleware(api: &ApiConfig) -> Cors {
    // 未配置来源时保持同源策略
    if api.cors_allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .max_age(3600);

    if api.cors_allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in &api.cors_allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }
    cors
}

/// 定期清理限流器中已恢复满额的客户端
fn spawn_limiter_cleanup(limiter: Arc<VisitorRateLimiter>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(LIMITER_CLEANUP_INTERVAL);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            limiter.retain_recent();
        }
    });
}

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime::now();

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .inspect_err(|e| tracing::error!("Server startup failed: {}", e))?;

    let config = get_config();
    let api_config = config.api.clone();
    validate_cors_config(&api_config);

    if api_config.trusted_proxies.is_empty() {
        warn!(
            "Rate limiting: auto-detect mode. Connections from private IPs will use X-Forwarded-For. \
             Configure api.trusted_proxies explicitly behind a public proxy."
        );
    } else {
        info!(
            "Rate limiting: trusted proxies {:?}",
            api_config.trusted_proxies
        );
    }

    if api_config.enable_playground {
        info!("GraphiQL playground enabled at GET /graphql");
    }

    spawn_limiter_cleanup(startup.visitor_limiter.clone());

    let storage = startup.storage.clone();
    let schema = web::Data::new(startup.schema);
    let services = web::Data::new(startup.services);
    let jwt = web::Data::new(startup.jwt);
    let storage_data = web::Data::new(startup.storage);
    let start_data = web::Data::new(app_start_time);
    let auth_governor = startup.auth_governor;
    let enable_playground = api_config.enable_playground;

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    debug!("Using {} worker threads", cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(build_cors_middleware(&api_config))
            .wrap(Compress::default())
            .wrap(
                DefaultHeaders::new()
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate"))
                    .add(("X-Content-Type-Options", "nosniff")),
            )
            .app_data(schema.clone())
            .app_data(services.clone())
            .app_data(jwt.clone())
            .app_data(storage_data.clone())
            .app_data(start_data.clone())
            .app_data(
                web::JsonConfig::default()
                    .limit(MAX_JSON_BODY_BYTES)
                    .error_handler(json_error_handler),
            )
            .service(graphql_routes(enable_playground))
            .service(auth_routes(&auth_governor))
            .service(health_routes())
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .workers(cpu_count)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?;

    warn!("Starting server at http://{}", bind_address);
    let server = server.run();
    let handle = server.handle();

    tokio::select! {
        res = server => {
            res.context("HTTP server error")?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            handle.stop(true).await;
        }
    }

    lifetime::shutdown::close_storage(storage).await;
    warn!("Graceful shutdown completed");
    Ok(())
}
