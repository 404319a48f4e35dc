//! URL 验证模块
//!
//! 图片地址、信息来源地址只接受 http(s)

use url::Url;

/// 允许的最大 URL 长度
pub const MAX_URL_LEN: usize = 2048;

/// URL 验证错误
#[derive(Debug, PartialEq, Eq)]
pub enum UrlValidationError {
    EmptyUrl,
    TooLong(usize),
    InvalidProtocol(String),
    MissingHost,
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::TooLong(len) => write!(f, "URL is too long ({} > {})", len, MAX_URL_LEN),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::MissingHost => write!(f, "URL must contain a host"),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

/// 验证 URL 并返回去除首尾空白后的值
///
/// `javascript:`、`data:`、`file:` 等协议都会被拒绝。
pub fn validate_url(url: &str) -> Result<String, UrlValidationError> {
    let url = url.trim();

    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }
    if url.len() > MAX_URL_LEN {
        return Err(UrlValidationError::TooLong(url.len()));
    }

    let parsed = Url::parse(url).map_err(|e| {
        // 没有 scheme 的相对路径也归为格式错误
        UrlValidationError::InvalidFormat(e.to_string())
    })?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => return Err(UrlValidationError::InvalidProtocol(format!("{}:", other))),
    }

    if parsed.host_str().is_none_or(|h| h.is_empty()) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url.to_string())
}
