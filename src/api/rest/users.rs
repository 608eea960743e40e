use crate::api::rest::{load_user, ApiResult, AppState};
use crate::db::models::user_models::{AuthToken, LoginCredentials, User, UserCreate, UserUpdate};
use crate::db::repositories::users::UsersRepository;
use crate::error::Error;
use crate::security::auth::{AuthService, CurrentUser};
use crate::security::{password, policy};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/token", post(login))
        .route("/", post(create_user).get(list_users))
        .route("/me", get(me))
        .route("/:id", get(get_user).put(update_user).delete(delete_user))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginCredentials>,
) -> ApiResult<Json<AuthToken>> {
    let auth = AuthService::new(Arc::clone(&state.db_pool), &state.security_config);
    let (_, token) = auth.login(&credentials).await?;

    Ok(Json(token))
}

async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let auth = AuthService::new(Arc::clone(&state.db_pool), &state.security_config);
    let user = auth
        .register(&payload.email, &payload.username, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn me(CurrentUser(caller): CurrentUser) -> Json<User> {
    Json(caller)
}

async fn list_users(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<User>>> {
    policy::require_admin(&caller)?;

    let users = UsersRepository::new(Arc::clone(&state.db_pool))
        .list(params.skip.unwrap_or(0), params.limit.unwrap_or(100))
        .await?;

    Ok(Json(users))
}

async fn get_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<User>> {
    let user = load_user(&state, &id).await?;
    policy::require_owner_or_admin(&caller, &user.id)?;

    Ok(Json(user))
}

async fn update_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserUpdate>,
) -> ApiResult<Json<User>> {
    let mut user = load_user(&state, &id).await?;
    policy::require_owner_or_admin(&caller, &user.id)?;

    // Only admins may grant or revoke admin rights
    if payload.is_admin.is_some() {
        policy::require_admin(&caller)?;
    }

    let repo = UsersRepository::new(Arc::clone(&state.db_pool));

    if let Some(username) = &payload.username {
        if *username != user.username && repo.get_by_username(username).await?.is_some() {
            return Err(Error::AlreadyExists("Username already exists".to_string()).into());
        }
    }
    if let Some(email) = &payload.email {
        if *email != user.email && repo.get_by_email(email).await?.is_some() {
            return Err(Error::AlreadyExists("Email already exists".to_string()).into());
        }
    }

    payload.apply(&mut user);

    if let Some(new_password) = &payload.password {
        user.password_hash = password::hash_password(new_password, &state.security_config)?;
    }

    let updated = repo.update(&user).await?;

    Ok(Json(updated))
}

async fn delete_user(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let user = load_user(&state, &id).await?;
    policy::require_owner_or_admin(&caller, &user.id)?;

    UsersRepository::new(Arc::clone(&state.db_pool))
        .delete(&user.id)
        .await?;

    info!("Deleted user: {}", user.username);

    Ok(StatusCode::NO_CONTENT)
}
