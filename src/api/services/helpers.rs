//! REST 响应构建

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::errors::CivicError;

use super::types::{ApiResponse, ErrorCode};

pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code,
            message: message.into(),
            data,
        })
}

pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

pub fn http_status(err: &CivicError) -> StatusCode {
    match err {
        CivicError::Validation(_) => StatusCode::BAD_REQUEST,
        CivicError::NotFound(_) => StatusCode::NOT_FOUND,
        CivicError::Conflict(_) => StatusCode::CONFLICT,
        CivicError::Unauthorized(_) | CivicError::Token(_) => StatusCode::UNAUTHORIZED,
        CivicError::Forbidden(_) => StatusCode::FORBIDDEN,
        CivicError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
        CivicError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// 内部错误只记日志，对外返回通用描述
pub fn error_from_civic(err: &CivicError) -> HttpResponse {
    let message = if err.is_client_safe() {
        err.message().to_string()
    } else {
        error!(code = err.code(), "{}", err.format_simple());
        "Internal server error".to_string()
    };
    json_response::<()>(http_status(err), ErrorCode::from(err), message, None)
}
