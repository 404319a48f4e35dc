pub mod ip;
pub mod password;
pub mod url_validator;

pub use ip::extract_client_ip;
pub use url_validator::validate_url;

/// 生成 URL 安全的随机字符串（用于未配置时的 JWT 密钥）
pub fn generate_secure_token(length: usize) -> String {
    use rand::RngExt;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
    let mut rng = rand::rng();
    (0..length)
        .map(|_| chars[rng.random_range(0..chars.len())] as char)
        .collect()
}

/// 去掉首尾空白，空字符串视为 None
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
