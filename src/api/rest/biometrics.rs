use crate::api::rest::{load_event, load_user, ApiError, ApiResult, AppState};
use crate::db::models::biometric_models::{
    BiometricData, BiometricDataCreate, BiometricDataUpdate, BiometricDevice,
    BiometricDeviceCreate, BiometricDeviceUpdate, BiometricSimulateRequest,
};
use crate::db::repositories::biometrics::{BiometricDataRepository, BiometricDevicesRepository};
use crate::error::Error;
use crate::security::auth::CurrentUser;
use crate::security::policy;
use crate::simulation::Simulator;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/data", post(create_data).get(list_data))
        .route("/data/:id", get(get_data).put(update_data).delete(delete_data))
        .route("/devices", post(create_device).get(list_devices))
        .route(
            "/devices/:device_id",
            get(get_device).put(update_device).delete(delete_device),
        )
        .route("/simulate", post(simulate))
}

#[derive(Debug, Deserialize)]
struct DataParams {
    user_id: Option<Uuid>,
    event_id: Option<Uuid>,
    device_id: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DeviceParams {
    is_active: Option<bool>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn create_data(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<BiometricDataCreate>,
) -> ApiResult<(StatusCode, Json<BiometricData>)> {
    let user = load_user(&state, &payload.user_id).await?;
    let event = load_event(&state, &payload.event_id).await?;
    policy::require_owner_or_admin(&caller, &user.id)?;

    let data = BiometricData {
        id: Uuid::new_v4(),
        user_id: user.id,
        event_id: event.id,
        device_id: payload.device_id,
        timestamp: Utc::now(),
        heart_rate: payload.heart_rate,
        gsr: payload.gsr,
        temperature: payload.temperature,
        energy_level: payload.energy_level,
        emotional_state: payload.emotional_state,
    };

    let created = BiometricDataRepository::new(Arc::clone(&state.db_pool))
        .create(&data)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_data(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<DataParams>,
) -> ApiResult<Json<Vec<BiometricData>>> {
    let user_filter = policy::scope_user_filter(&caller, params.user_id);

    let data = BiometricDataRepository::new(Arc::clone(&state.db_pool))
        .list(
            user_filter,
            params.event_id,
            params.device_id.as_deref(),
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(data))
}

async fn get_data(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<BiometricData>> {
    let data = policy::authorize_owned(
        BiometricDataRepository::new(Arc::clone(&state.db_pool))
            .get_by_id(&id)
            .await?,
        &caller,
        |d: &BiometricData| d.user_id,
        "Biometric data",
        &id,
    )?;

    Ok(Json(data))
}

async fn update_data(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<BiometricDataUpdate>,
) -> ApiResult<Json<BiometricData>> {
    let repo = BiometricDataRepository::new(Arc::clone(&state.db_pool));

    let mut data = policy::authorize_owned(
        repo.get_by_id(&id).await?,
        &caller,
        |d: &BiometricData| d.user_id,
        "Biometric data",
        &id,
    )?;

    payload.apply(&mut data);

    let updated = repo.update(&data).await?;

    Ok(Json(updated))
}

async fn delete_data(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = BiometricDataRepository::new(Arc::clone(&state.db_pool));

    let data = policy::authorize_owned(
        repo.get_by_id(&id).await?,
        &caller,
        |d: &BiometricData| d.user_id,
        "Biometric data",
        &id,
    )?;

    repo.delete(&data.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_device(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<BiometricDeviceCreate>,
) -> ApiResult<(StatusCode, Json<BiometricDevice>)> {
    policy::require_admin(&caller)?;

    let repo = BiometricDevicesRepository::new(Arc::clone(&state.db_pool));

    if repo.get_by_device_id(&payload.device_id).await?.is_some() {
        return Err(Error::AlreadyExists("Device ID already registered".to_string()).into());
    }

    let now = Utc::now();
    let device = BiometricDevice {
        id: Uuid::new_v4(),
        device_id: payload.device_id,
        device_type: payload.device_type,
        is_active: payload.is_active,
        last_connection: None,
        created_at: now,
        updated_at: now,
    };

    let created = repo.create(&device).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_devices(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<DeviceParams>,
) -> ApiResult<Json<Vec<BiometricDevice>>> {
    let devices = BiometricDevicesRepository::new(Arc::clone(&state.db_pool))
        .list(
            params.is_active,
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(devices))
}

async fn get_device(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(device_id): Path<String>,
) -> ApiResult<Json<BiometricDevice>> {
    let device = BiometricDevicesRepository::new(Arc::clone(&state.db_pool))
        .get_by_device_id(&device_id)
        .await?
        .ok_or_else(|| {
            ApiError::from(Error::NotFound(format!("Device not found: {}", device_id)))
        })?;

    Ok(Json(device))
}

async fn update_device(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(device_id): Path<String>,
    Json(payload): Json<BiometricDeviceUpdate>,
) -> ApiResult<Json<BiometricDevice>> {
    policy::require_admin(&caller)?;

    let repo = BiometricDevicesRepository::new(Arc::clone(&state.db_pool));

    let mut device = repo.get_by_device_id(&device_id).await?.ok_or_else(|| {
        ApiError::from(Error::NotFound(format!("Device not found: {}", device_id)))
    })?;

    payload.apply(&mut device);
    device.last_connection = Some(Utc::now());

    let updated = repo.update(&device).await?;

    Ok(Json(updated))
}

async fn delete_device(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(device_id): Path<String>,
) -> ApiResult<StatusCode> {
    policy::require_admin(&caller)?;

    let repo = BiometricDevicesRepository::new(Arc::clone(&state.db_pool));

    let device = repo.get_by_device_id(&device_id).await?.ok_or_else(|| {
        ApiError::from(Error::NotFound(format!("Device not found: {}", device_id)))
    })?;

    repo.delete(&device.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn simulate(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(payload): Json<BiometricSimulateRequest>,
) -> ApiResult<(StatusCode, Json<BiometricData>)> {
    let user = load_user(&state, &payload.user_id).await?;
    let event = load_event(&state, &payload.event_id).await?;

    let sample = Simulator::new(payload.seed).biometrics();

    let data = BiometricData {
        id: Uuid::new_v4(),
        user_id: user.id,
        event_id: event.id,
        device_id: payload.device_id,
        timestamp: Utc::now(),
        heart_rate: Some(sample.heart_rate),
        gsr: Some(sample.gsr),
        temperature: Some(sample.temperature),
        energy_level: Some(sample.energy_level),
        emotional_state: Some(sample.emotional_state.to_string()),
    };

    let created = BiometricDataRepository::new(Arc::clone(&state.db_pool))
        .create(&data)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
