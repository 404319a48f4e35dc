//! REST API 类型定义

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::CivicError;
use crate::storage::User;

/// API 错误码，序列化为数字
///
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
    ServiceUnavailable = 1030,

    AuthFailed = 2000,
    TokenInvalid = 2002,
    RateLimitExceeded = 2004,
}

impl From<&CivicError> for ErrorCode {
    fn from(err: &CivicError) -> Self {
        match err {
            CivicError::Validation(_) => ErrorCode::BadRequest,
            CivicError::NotFound(_) => ErrorCode::NotFound,
            CivicError::Conflict(_) => ErrorCode::Conflict,
            CivicError::Unauthorized(_) => ErrorCode::AuthFailed,
            CivicError::Token(_) => ErrorCode::TokenInvalid,
            CivicError::Forbidden(_) => ErrorCode::Forbidden,
            CivicError::RateLimited(_) => ErrorCode::RateLimitExceeded,
            CivicError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            CivicError::DatabaseConfig(_)
            | CivicError::DatabaseOperation(_)
            | CivicError::FileOperation(_)
            | CivicError::Serialization(_)
            | CivicError::PasswordHash(_) => ErrorCode::InternalServerError,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, Clone, Debug)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct AuthData {
    pub token: String,
    /// 秒
    pub expires_in: u64,
    pub user: User,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthStorageCheck {
    pub status: String,
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    /// 秒
    pub uptime: u64,
    pub storage: HealthStorageCheck,
    pub response_time_ms: u64,
}
