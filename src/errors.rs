use std::fmt;

#[derive(Debug, Clone)]
pub enum CivicError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
    Forbidden(String),
    RateLimited(String),
    Serialization(String),
    PasswordHash(String),
    Token(String),
}

impl CivicError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            CivicError::DatabaseConfig(_) => "E001",
            CivicError::DatabaseConnection(_) => "E002",
            CivicError::DatabaseOperation(_) => "E003",
            CivicError::FileOperation(_) => "E004",
            CivicError::Validation(_) => "E005",
            CivicError::NotFound(_) => "E006",
            CivicError::Conflict(_) => "E007",
            CivicError::Unauthorized(_) => "E008",
            CivicError::Forbidden(_) => "E009",
            CivicError::RateLimited(_) => "E010",
            CivicError::Serialization(_) => "E011",
            CivicError::PasswordHash(_) => "E012",
            CivicError::Token(_) => "E013",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            CivicError::DatabaseConfig(_) => "Database Configuration Error",
            CivicError::DatabaseConnection(_) => "Database Connection Error",
            CivicError::DatabaseOperation(_) => "Database Operation Error",
            CivicError::FileOperation(_) => "File Operation Error",
            CivicError::Validation(_) => "Validation Error",
            CivicError::NotFound(_) => "Resource Not Found",
            CivicError::Conflict(_) => "Resource Conflict",
            CivicError::Unauthorized(_) => "Unauthorized",
            CivicError::Forbidden(_) => "Forbidden",
            CivicError::RateLimited(_) => "Rate Limited",
            CivicError::Serialization(_) => "Serialization Error",
            CivicError::PasswordHash(_) => "Password Hash Error",
            CivicError::Token(_) => "Token Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            CivicError::DatabaseConfig(msg)
            | CivicError::DatabaseConnection(msg)
            | CivicError::DatabaseOperation(msg)
            | CivicError::FileOperation(msg)
            | CivicError::Validation(msg)
            | CivicError::NotFound(msg)
            | CivicError::Conflict(msg)
            | CivicError::Unauthorized(msg)
            | CivicError::Forbidden(msg)
            | CivicError::RateLimited(msg)
            | CivicError::Serialization(msg)
            | CivicError::PasswordHash(msg)
            | CivicError::Token(msg) => msg,
        }
    }

    /// GraphQL `extensions.code`
    pub fn graphql_code(&self) -> &'static str {
        match self {
            CivicError::DatabaseConfig(_)
            | CivicError::DatabaseConnection(_)
            | CivicError::DatabaseOperation(_) => "DATABASE_ERROR",
            CivicError::Validation(_) => "BAD_USER_INPUT",
            CivicError::NotFound(_) => "NOT_FOUND",
            CivicError::Conflict(_) => "CONFLICT",
            CivicError::Unauthorized(_) | CivicError::Token(_) => "UNAUTHENTICATED",
            CivicError::Forbidden(_) => "FORBIDDEN",
            CivicError::RateLimited(_) => "RATE_LIMITED",
            CivicError::FileOperation(_)
            | CivicError::Serialization(_)
            | CivicError::PasswordHash(_) => "INTERNAL",
        }
    }

    /// 是否可以把 message 原样返回给客户端
    ///
    /// 数据库与内部错误只记录日志，对外返回通用描述。
    pub fn is_client_safe(&self) -> bool {
        matches!(
            self,
            CivicError::Validation(_)
                | CivicError::NotFound(_)
                | CivicError::Conflict(_)
                | CivicError::Unauthorized(_)
                | CivicError::Forbidden(_)
                | CivicError::RateLimited(_)
                | CivicError::Token(_)
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for CivicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CivicError {}

// 便捷的构造函数
impl CivicError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        CivicError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        CivicError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        CivicError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        CivicError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        CivicError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        CivicError::NotFound(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        CivicError::Conflict(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        CivicError::Unauthorized(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        CivicError::Forbidden(msg.into())
    }

    pub fn rate_limited<T: Into<String>>(msg: T) -> Self {
        CivicError::RateLimited(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        CivicError::Serialization(msg.into())
    }

    pub fn password_hash<T: Into<String>>(msg: T) -> Self {
        CivicError::PasswordHash(msg.into())
    }

    pub fn token<T: Into<String>>(msg: T) -> Self {
        CivicError::Token(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for CivicError {
    fn from(err: sea_orm::DbErr) -> Self {
        CivicError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for CivicError {
    fn from(err: std::io::Error) -> Self {
        CivicError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for CivicError {
    fn from(err: serde_json::Error) -> Self {
        CivicError::Serialization(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for CivicError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        CivicError::Token(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CivicError>;
