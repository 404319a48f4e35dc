//! 输入校验工具（各 service 共用）

use crate::errors::{CivicError, Result};
use crate::utils::normalize_optional;
use crate::utils::url_validator::validate_url;

pub const MAX_TITLE_LEN: usize = 200;
pub const MAX_PLACE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 10_000;
pub const MAX_IMAGES: usize = 20;
pub const MAX_EMAIL_LEN: usize = 254;

/// 必填文本：去掉首尾空白后非空且不超过 `max` 个字符
pub fn required_text(field: &str, value: &str, max: usize) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CivicError::validation(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max {
        return Err(CivicError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(value.to_string())
}

/// 可选文本：空白视为未填写
pub fn optional_text(field: &str, value: Option<String>, max: usize) -> Result<Option<String>> {
    match normalize_optional(value) {
        Some(v) => required_text(field, &v, max).map(Some),
        None => Ok(None),
    }
}

/// 可选 http(s) URL
pub fn optional_url(field: &str, value: Option<String>) -> Result<Option<String>> {
    match normalize_optional(value) {
        Some(v) => validate_url(&v)
            .map(Some)
            .map_err(|e| CivicError::validation(format!("{}: {}", field, e))),
        None => Ok(None),
    }
}

/// 图片 URL 列表：最多 MAX_IMAGES 个，均为 http(s)
pub fn image_urls(images: Vec<String>) -> Result<Vec<String>> {
    if images.len() > MAX_IMAGES {
        return Err(CivicError::validation(format!(
            "at most {} images are allowed",
            MAX_IMAGES
        )));
    }
    images
        .iter()
        .enumerate()
        .map(|(i, url)| {
            validate_url(url)
                .map_err(|e| CivicError::validation(format!("images[{}]: {}", i, e)))
        })
        .collect()
}

/// 规范化 email（小写）并做基本格式检查
pub fn email(value: &str) -> Result<String> {
    let email = value.trim().to_lowercase();
    let valid = email.len() <= MAX_EMAIL_LEN
        && !email.chars().any(char::is_whitespace)
        && email
            .split_once('@')
            .is_some_and(|(local, domain)| {
                !local.is_empty()
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains('@')
            });
    if !valid {
        return Err(CivicError::validation("email address is invalid"));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("title", "  Flood  ", 10).ok().as_deref(), Some("Flood"));
        assert!(required_text("title", "   ", 10).is_err());
        assert!(required_text("title", "abcdefghijk", 10).is_err());
    }

    #[test]
    fn test_optional_text_blank_is_none() {
        assert_eq!(optional_text("district", Some("  ".into()), 10).ok(), Some(None));
        assert_eq!(
            optional_text("district", Some(" Pune ".into()), 10).ok(),
            Some(Some("Pune".to_string()))
        );
    }

    #[test]
    fn test_image_urls() {
        assert!(image_urls(vec!["https://cdn.example.org/a.png".into()]).is_ok());
        assert!(image_urls(vec!["ftp://cdn.example.org/a.png".into()]).is_err());
        assert!(image_urls(vec!["javascript:alert(1)".into()]).is_err());
        let too_many = vec!["https://cdn.example.org/a.png".to_string(); MAX_IMAGES + 1];
        assert!(image_urls(too_many).is_err());
    }

    #[test]
    fn test_email() {
        assert_eq!(email(" Asha@Example.ORG ").ok().as_deref(), Some("asha@example.org"));
        assert!(email("no-at-sign").is_err());
        assert!(email("a@localhost").is_err());
        assert!(email("a b@example.org").is_err());
    }
}
