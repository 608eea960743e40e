use crate::api::rest::{ApiError, AppState};
use crate::config::SecurityConfig;
use crate::db::models::user_models::{AuthToken, LoginCredentials, User};
use crate::db::repositories::users::UsersRepository;
use crate::error::Error;
use crate::security::{password, SecurityService};
use anyhow::Result;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Authentication service for handling user login and registration
pub struct AuthService {
    users_repo: UsersRepository,
    security: SecurityService,
    config: SecurityConfig,
}

impl AuthService {
    /// Create a new authentication service
    pub fn new(pool: Arc<PgPool>, config: &SecurityConfig) -> Self {
        Self {
            users_repo: UsersRepository::new(pool),
            security: SecurityService::new(config.clone()),
            config: config.clone(),
        }
    }

    /// Login a user with username/password
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<(User, AuthToken)> {
        let user = self
            .users_repo
            .get_by_username(&credentials.username)
            .await?
            .ok_or_else(|| Error::Authentication("Invalid username or password".to_string()))?;

        if !user.is_active {
            return Err(Error::Authentication("User account is inactive".to_string()).into());
        }

        let valid = password::verify_password(&credentials.password, &user.password_hash)?;

        if !valid {
            return Err(Error::Authentication("Invalid username or password".to_string()).into());
        }

        let token = self.security.generate_token(&user)?;

        info!("User logged in: {}", user.username);

        Ok((user, token))
    }

    /// Register a new user (always an active non-admin)
    pub async fn register(&self, email: &str, username: &str, password: &str) -> Result<User> {
        if self.users_repo.get_by_username(username).await?.is_some() {
            return Err(Error::AlreadyExists("Username already exists".to_string()).into());
        }

        if self.users_repo.get_by_email(email).await?.is_some() {
            return Err(Error::AlreadyExists("Email already exists".to_string()).into());
        }

        let password_hash = password::hash_password(password, &self.config)?;

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            username: username.to_string(),
            password_hash,
            is_active: true,
            is_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let created_user = self.users_repo.create(&user).await?;

        info!("New user registered: {}", username);

        Ok(created_user)
    }
}

/// The authenticated caller, resolved from the bearer token.
///
/// Inactive accounts and stale tokens are rejected here, so handlers only
/// ever see a live user row.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                ApiError::from(Error::Authentication(
                    "Missing authorization header".to_string(),
                ))
            })?;

        let token = header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::from(Error::Authentication(
                "Expected a bearer token".to_string(),
            ))
        })?;

        let token_data = state
            .security
            .validate_token(token)
            .map_err(ApiError::from)?;

        let user_id = token_data.claims.user_id().map_err(|_| {
            ApiError::from(Error::Authentication("Invalid user ID in token".to_string()))
        })?;

        let user = UsersRepository::new(Arc::clone(&state.db_pool))
            .get_by_id(&user_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                ApiError::from(Error::Authentication("Unknown user".to_string()))
            })?;

        if !user.is_active {
            return Err(ApiError::from(Error::Authentication(
                "User account is inactive".to_string(),
            )));
        }

        Ok(CurrentUser(user))
    }
}
