use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::UserId;

/// JWT Claims - data stored in the token
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,      // Subject (user_id as string)
    pub user_id: UserId,  // User UUID
    pub username: String, // Username (for logging/debugging)
    pub is_admin: bool,   // Admin flag
    pub exp: i64,         // Expiration timestamp
    pub iat: i64,         // Issued at timestamp
    pub iss: String,      // Issuer
    pub jti: String,      // JWT ID (unique token identifier)
}

/// JWT Service - creates and verifies session tokens
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl: chrono::Duration,
}

impl JwtService {
    /// Create new JWT service with secret, issuer and token lifetime
    pub fn new(secret: &str, issuer: String, ttl_hours: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            ttl: chrono::Duration::hours(ttl_hours),
        }
    }

    /// Session lifetime in seconds (used for the cookie Max-Age)
    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Create a new session token for a user
    pub fn create_token(&self, user_id: UserId, username: String, is_admin: bool) -> Result<String> {
        let now = chrono::Utc::now();
        let exp = now + self.ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            username,
            is_admin,
            exp: exp.timestamp(),
            iat: now.timestamp(),
            iss: self.issuer.clone(),
            jti: Uuid::new_v4().to_string(), // Unique token ID
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(Into::into)
    }

    /// Verify and decode a token
    ///
    /// Returns claims if token is valid and not expired
    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_verify_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string(), 24);
        let user_id = UserId::new();

        let token = service
            .create_token(user_id, "lego_fan".to_string(), true)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "lego_fan");
        assert!(claims.is_admin);
        assert_eq!(claims.iss, "test_issuer");
    }

    #[test]
    fn test_invalid_token() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string(), 24);
        assert!(service.verify_token("invalid_token").is_err());
    }

    #[test]
    fn test_wrong_secret() {
        let service1 = JwtService::new("secret1", "test_issuer".to_string(), 24);
        let service2 = JwtService::new("secret2", "test_issuer".to_string(), 24);

        let token = service1
            .create_token(UserId::new(), "lego_fan".to_string(), false)
            .unwrap();

        // Token created with secret1 should not verify with secret2
        assert!(service2.verify_token(&token).is_err());
    }

    #[test]
    fn test_wrong_issuer() {
        let ours = JwtService::new("secret", "toyshare".to_string(), 24);
        let theirs = JwtService::new("secret", "elsewhere".to_string(), 24);

        let token = theirs
            .create_token(UserId::new(), "lego_fan".to_string(), false)
            .unwrap();
        assert!(ours.verify_token(&token).is_err());
    }

    #[test]
    fn test_expiry_follows_ttl() {
        let service = JwtService::new("test_secret_key", "test_issuer".to_string(), 168);
        let token = service
            .create_token(UserId::new(), "lego_fan".to_string(), false)
            .unwrap();

        let claims = service.verify_token(&token).unwrap();

        let expires_in = claims.exp - chrono::Utc::now().timestamp();
        assert!(expires_in > 167 * 3600);
        assert!(expires_in <= 168 * 3600);
        assert_eq!(service.ttl_seconds(), 168 * 3600);
    }

    #[test]
    fn test_expired_token_is_rejected() {
        // Past the default 60s leeway
        let service = JwtService::new("test_secret_key", "test_issuer".to_string(), -1);
        let token = service
            .create_token(UserId::new(), "lego_fan".to_string(), false)
            .unwrap();
        assert!(service.verify_token(&token).is_err());
    }
}
