use crate::config::{ApiConfig, SecurityConfig};
use crate::db::models::event_models::Event;
use crate::db::models::user_models::User;
use crate::db::repositories::events::EventsRepository;
use crate::db::repositories::users::UsersRepository;
use crate::error::Error;
use crate::security::SecurityService;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::info;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use uuid::Uuid;

pub mod biometrics;
pub mod events;
pub mod movement;
pub mod sound;
pub mod users;
pub mod visualization;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: Arc<PgPool>,
    pub security: SecurityService,
    pub security_config: SecurityConfig,
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub message: String,
    pub status: u16,
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::Authentication(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::UNAUTHORIZED.as_u16(),
            },
            Error::Authorization(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::FORBIDDEN.as_u16(),
            },
            Error::NotFound(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::NOT_FOUND.as_u16(),
            },
            Error::AlreadyExists(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::CONFLICT.as_u16(),
            },
            Error::Validation(_) | Error::Config(_) => ApiError {
                message: err.to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
            },
            _ => ApiError {
                message: err.to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            },
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(err) = err.downcast_ref::<Error>() {
            return err.clone().into();
        }

        ApiError {
            message: err.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = Json(self);
        (status, body).into_response()
    }
}

/// Load a user row or fail with NotFound.
///
/// Handlers call this before any authorization check so a missing row
/// answers 404 rather than 403.
pub(crate) async fn load_user(state: &AppState, id: &Uuid) -> ApiResult<User> {
    let user = UsersRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("User not found: {}", id))))?;

    Ok(user)
}

/// Load an event row or fail with NotFound.
pub(crate) async fn load_event(state: &AppState, id: &Uuid) -> ApiResult<Event> {
    let event = EventsRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Event not found: {}", id))))?;

    Ok(event)
}

pub struct RestApi {
    config: ApiConfig,
    security_config: SecurityConfig,
    db_pool: Arc<PgPool>,
}

impl RestApi {
    pub fn new(
        config: &ApiConfig,
        security_config: &SecurityConfig,
        db_pool: Arc<PgPool>,
    ) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            security_config: security_config.clone(),
            db_pool,
        })
    }

    pub async fn run(&self) -> Result<()> {
        let state = AppState {
            db_pool: Arc::clone(&self.db_pool),
            security: SecurityService::new(self.security_config.clone()),
            security_config: self.security_config.clone(),
        };

        // Allow all origins and preflight requests
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .allow_credentials(false)
            .max_age(Duration::from_secs(3600));

        let api = Router::new()
            .nest("/users", users::router())
            .nest("/events", events::router())
            .nest("/biometrics", biometrics::router())
            .nest("/movement", movement::router())
            .nest("/sound", sound::router())
            .nest("/visualization", visualization::router());

        let app = Router::new()
            .route("/", get(service_info))
            .route("/health", get(health))
            .nest("/api/v1", api)
            .with_state(state)
            .layer(cors);

        let addr = self.config.address.clone() + ":" + &self.config.port.to_string();
        let addr: SocketAddr = addr.parse()?;

        info!("API server listening on {}", addr);

        let listener = TcpListener::bind(addr).await?;

        axum::Server::from_tcp(listener.into_std()?)?
            .serve(app.into_make_service())
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutdown signal received");
            })
            .await?;

        Ok(())
    }
}

async fn service_info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "Codance API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

async fn health(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    sqlx::query("SELECT 1")
        .execute(&*state.db_pool)
        .await
        .map_err(|e| ApiError::from(Error::Database(format!("Health check failed: {}", e))))?;

    Ok(Json(json!({ "status": "healthy", "database": "connected" })))
}
