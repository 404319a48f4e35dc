use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::api::graphql::{AppSchema, VisitorRateLimiter, build_schema};
use crate::api::jwt::JwtService;
use crate::api::services::{AuthGovernorConfig, auth_governor_config};
use crate::config::get_config;
use crate::services::AppServices;
use crate::storage::{SeaOrmStorage, StorageFactory};

/// 服务器启动所需的共享组件
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub services: AppServices,
    pub schema: AppSchema,
    pub jwt: JwtService,
    pub visitor_limiter: Arc<VisitorRateLimiter>,
    pub auth_governor: AuthGovernorConfig,
}

/// 准备服务器启动的上下文：存储、服务、GraphQL schema、限流器
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let config = get_config();

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().backend
    );

    let services = AppServices::new(storage.clone());

    // 预先创建访客统计行，首个请求不必走创建路径
    match services.stats.get_stats().await {
        Ok(stats) => debug!("Visitor stats ready: total = {}", stats.total_visitors),
        Err(e) => warn!("Failed to prepare visitor stats (non-fatal): {}", e),
    }

    let jwt = JwtService::from_config(&config.api);

    let visitor_limiter = Arc::new(VisitorRateLimiter::from_config(&config.rate_limit));
    debug!(
        "Visitor rate limit: {} per {}s",
        config.rate_limit.visitor_burst.max(1),
        config.rate_limit.visitor_period_secs.max(1)
    );

    let auth_governor = auth_governor_config(&config.rate_limit)
        .context("Invalid auth rate limit configuration")?;

    let schema = build_schema(services.clone(), visitor_limiter.clone());

    info!(
        "Pre-startup processing completed in {:.2?}",
        start_time.elapsed()
    );

    Ok(StartupContext {
        storage,
        services,
        schema,
        jwt,
        visitor_limiter,
        auth_governor,
    })
}
