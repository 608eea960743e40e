use crate::db::models::user_models::{AuthToken, User};
use crate::{config::SecurityConfig, error::Error};
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod auth;
pub mod password;
pub mod policy;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User name
    pub name: String,
    /// User role ("admin" or "user")
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
    /// Issued at (Unix timestamp)
    pub iat: usize,
}

impl Claims {
    /// Get the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Security service for handling authentication and authorization
#[derive(Clone)]
pub struct SecurityService {
    config: SecurityConfig,
}

impl SecurityService {
    /// Create a new security service
    pub fn new(config: SecurityConfig) -> Self {
        Self { config }
    }

    /// Generate a JWT token for a user
    pub fn generate_token(&self, user: &User) -> Result<AuthToken> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.jwt_expiration_minutes as i64);

        let claims = Claims {
            sub: user.id.to_string(),
            name: user.username.clone(),
            role: if user.is_admin { "admin" } else { "user" }.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| Error::Authentication(format!("Failed to generate JWT token: {}", e)))?;

        Ok(AuthToken {
            access_token: token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.jwt_expiration_minutes * 60, // Convert to seconds
        })
    }

    /// Validate and decode a JWT token
    pub fn validate_token(&self, token: &str) -> Result<TokenData<Claims>> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| Error::Authentication(format!("Invalid token: {}", e)))?;

        Ok(token_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user(is_admin: bool) -> User {
        User {
            id: Uuid::new_v4(),
            email: "dancer@codance.com".to_string(),
            username: "dancer".to_string(),
            password_hash: "hash".to_string(),
            is_active: true,
            is_admin,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trip_preserves_identity() {
        let service = SecurityService::new(SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_minutes: 60,
            password_hash_cost: 4,
        });
        let user = test_user(false);

        let token = service.generate_token(&user).unwrap();
        assert_eq!(token.token_type, "Bearer");
        assert_eq!(token.expires_in, 3600);

        let decoded = service.validate_token(&token.access_token).unwrap();
        assert_eq!(decoded.claims.user_id().unwrap(), user.id);
        assert_eq!(decoded.claims.role, "user");
    }

    #[test]
    fn admin_role_is_encoded() {
        let service = SecurityService::new(SecurityConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_minutes: 5,
            password_hash_cost: 4,
        });
        let token = service.generate_token(&test_user(true)).unwrap();
        let decoded = service.validate_token(&token.access_token).unwrap();
        assert_eq!(decoded.claims.role, "admin");
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issue = SecurityService::new(SecurityConfig {
            jwt_secret: "secret-a".to_string(),
            jwt_expiration_minutes: 5,
            password_hash_cost: 4,
        });
        let verify = SecurityService::new(SecurityConfig {
            jwt_secret: "secret-b".to_string(),
            jwt_expiration_minutes: 5,
            password_hash_cost: 4,
        });
        let token = issue.generate_token(&test_user(false)).unwrap();
        assert!(verify.validate_token(&token.access_token).is_err());
    }
}
