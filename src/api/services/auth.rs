//! 账号注册与登录端点

use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, KeyExtractor, SimpleKeyExtractionError,
};
use actix_web::dev::ServiceRequest;
use actix_web::{Responder, web};
use governor::middleware::NoOpMiddleware;
use tracing::{error, info};

use crate::api::jwt::JwtService;
use crate::config::RateLimitConfig;
use crate::errors::CivicError;
use crate::services::AppServices;
use crate::storage::User;
use crate::utils::ip::extract_client_ip_from_parts;

use super::helpers::{created_response, error_from_civic, success_response};
use super::types::{AuthData, LoginRequest, RegisterRequest};

/// 基于客户端 IP 的限流 key
///
/// 与 GraphQL 访客限流使用同一套 IP 解析规则（可信代理 / 私有地址）。
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor;

impl KeyExtractor for ClientIpKeyExtractor {
    type Key = String;
    type KeyExtractionError = SimpleKeyExtractionError<&'static str>;

    fn extract(&self, req: &ServiceRequest) -> Result<Self::Key, Self::KeyExtractionError> {
        extract_client_ip_from_parts(&req.connection_info(), req.headers())
            .ok_or_else(|| SimpleKeyExtractionError::new("Unable to extract client IP"))
    }
}

pub type AuthGovernorConfig = GovernorConfig<ClientIpKeyExtractor, NoOpMiddleware>;

/// 登录 / 注册限流配置，超限返回 429
pub fn auth_governor_config(config: &RateLimitConfig) -> Option<AuthGovernorConfig> {
    GovernorConfigBuilder::default()
        .seconds_per_request(config.auth_seconds_per_request.max(1))
        .burst_size(config.auth_burst.max(1))
        .key_extractor(ClientIpKeyExtractor)
        .finish()
}

fn issue_token(jwt: &JwtService, user: User) -> Result<AuthData, CivicError> {
    let token = jwt.generate_access_token(&user).map_err(|e| {
        error!("Failed to generate access token: {}", e);
        CivicError::from(e)
    })?;
    Ok(AuthData {
        token,
        expires_in: jwt.expires_in(),
        user,
    })
}

pub async fn login(
    services: web::Data<AppServices>,
    jwt: web::Data<JwtService>,
    body: web::Json<LoginRequest>,
) -> impl Responder {
    let body = body.into_inner();
    let result = services
        .users
        .authenticate(&body.email, &body.password)
        .await
        .and_then(|user| issue_token(&jwt, user));

    match result {
        Ok(data) => {
            info!("Login successful: {}", data.user.id);
            success_response(data)
        }
        Err(e) => error_from_civic(&e),
    }
}

pub async fn register(
    services: web::Data<AppServices>,
    jwt: web::Data<JwtService>,
    body: web::Json<RegisterRequest>,
) -> impl Responder {
    let body = body.into_inner();
    let result = services
        .users
        .register(&body.name, &body.email, &body.password)
        .await
        .and_then(|user| issue_token(&jwt, user));

    match result {
        Ok(data) => {
            info!("User registered: {}", data.user.id);
            created_response(data)
        }
        Err(e) => error_from_civic(&e),
    }
}

/// 认证路由 `/api/auth`
///
/// - POST /api/auth/login（限流）
/// - POST /api/auth/register（限流）
pub fn auth_routes(limiter: &AuthGovernorConfig) -> actix_web::Scope {
    web::scope("/api/auth")
        .route("/login", web::post().to(login).wrap(Governor::new(limiter)))
        .route(
            "/register",
            web::post().to(register).wrap(Governor::new(limiter)),
        )
}

/// JSON 解析失败时返回统一格式
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    let response = error_from_civic(&CivicError::validation(format!("invalid JSON body: {}", err)));
    actix_web::error::InternalError::from_response(err, response).into()
}
