use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ApiConfig;
use crate::storage::{Role, User};

const ACCESS_TOKEN_TYPE: &str = "access";

/// Access Token Claims
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// user id
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    pub token_type: String,
}

/// JWT Service for issuing and validating HS256 access tokens
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_minutes: u64,
}

impl JwtService {
    pub fn new(secret: &str, access_token_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_minutes: access_token_minutes.max(1),
        }
    }

    /// Create JwtService from the `[api]` section
    ///
    /// An empty secret is replaced by a random one, so issued tokens do not
    /// survive a restart.
    pub fn from_config(api: &ApiConfig) -> Self {
        let secret = if api.jwt_secret.trim().is_empty() {
            warn!("api.jwt_secret not configured, generating a random secret");
            crate::utils::generate_secure_token(48)
        } else {
            api.jwt_secret.clone()
        };
        Self::new(&secret, api.access_token_minutes)
    }

    /// Token lifetime in seconds
    pub fn expires_in(&self) -> u64 {
        self.access_token_minutes * 60
    }

    pub fn generate_access_token(&self, user: &User) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::minutes(self.access_token_minutes as i64)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    pub fn validate_access_token(
        &self,
        token: &str,
    ) -> Result<AccessClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<AccessClaims>(token, &self.decoding_key, &Validation::default())?;

        if token_data.claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn service() -> JwtService {
        JwtService::new(SECRET, 15)
    }

    fn user(role: Role) -> User {
        let now = Utc::now();
        User {
            id: "user-1".to_string(),
            name: "Ravi".to_string(),
            email: "ravi@example.org".to_string(),
            role,
            is_verified: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = service();
        let token = service.generate_access_token(&user(Role::Moderator)).unwrap();
        let claims = service.validate_access_token(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role, Role::Moderator);
        assert!(claims.exp > claims.iat);
        assert_eq!(service.expires_in(), 900);
    }

    #[test]
    fn test_tampered_token_rejected() {
        let service = service();
        let token = service.generate_access_token(&user(Role::User)).unwrap();

        // 替换 payload，签名不再匹配
        let parts: Vec<&str> = token.split('.').collect();
        let admin_token = service.generate_access_token(&user(Role::Admin)).unwrap();
        let admin_payload = admin_token.split('.').nth(1).unwrap();
        let forged = format!("{}.{}.{}", parts[0], admin_payload, parts[2]);

        assert!(service.validate_access_token(&forged).is_err());
        assert!(service.validate_access_token("invalid.token.here").is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = service().generate_access_token(&user(Role::Admin)).unwrap();
        let other = JwtService::new("different_secret_key_32_bytes!!", 15);
        assert!(other.validate_access_token(&token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: "user-1".to_string(),
            role: Role::Admin,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(service().validate_access_token(&token).is_err());
    }

    #[test]
    fn test_empty_secret_is_replaced() {
        let api = ApiConfig::default();
        let a = JwtService::from_config(&api);
        let b = JwtService::from_config(&api);
        let token = a.generate_access_token(&user(Role::User)).unwrap();
        assert!(b.validate_access_token(&token).is_err());
    }
}
