use crate::api::rest::{load_event, ApiError, ApiResult, AppState};
use crate::db::models::movement_models::{
    DetectedPattern, DetectedPatternCreate, MovementData, MovementDataCreate, MovementDataUpdate,
    MovementPattern, MovementPatternCreate, MovementPatternUpdate, MovementSimulateRequest,
};
use crate::db::repositories::movement::{
    DetectedPatternsRepository, MovementDataRepository, MovementPatternsRepository,
};
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
        .route("/patterns", post(create_pattern).get(list_patterns))
        .route(
            "/patterns/:id",
            get(get_pattern).put(update_pattern).delete(delete_pattern),
        )
        .route(
            "/detected-patterns",
            post(create_detection).get(list_detections),
        )
        .route("/simulate", post(simulate))
}

#[derive(Debug, Deserialize)]
struct DataParams {
    event_id: Option<Uuid>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct DetectionParams {
    event_id: Option<Uuid>,
    pattern_id: Option<Uuid>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn create_data(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(payload): Json<MovementDataCreate>,
) -> ApiResult<(StatusCode, Json<MovementData>)> {
    let event = load_event(&state, &payload.event_id).await?;

    let data = MovementData {
        id: Uuid::new_v4(),
        event_id: event.id,
        timestamp: Utc::now(),
        data_type: payload.data_type,
        coordinates: payload.coordinates,
        velocity: payload.velocity,
        acceleration: payload.acceleration,
        crowd_density: payload.crowd_density,
        movement_intensity: payload.movement_intensity,
    };

    let created = MovementDataRepository::new(Arc::clone(&state.db_pool))
        .create(&data)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_data(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<DataParams>,
) -> ApiResult<Json<Vec<MovementData>>> {
    let data = MovementDataRepository::new(Arc::clone(&state.db_pool))
        .list(
            params.event_id,
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(data))
}

async fn get_data(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MovementData>> {
    let data = MovementDataRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(&id)
        .await?
        .ok_or_else(|| {
            ApiError::from(Error::NotFound(format!("Movement data not found: {}", id)))
        })?;

    Ok(Json(data))
}

async fn update_data(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MovementDataUpdate>,
) -> ApiResult<Json<MovementData>> {
    let repo = MovementDataRepository::new(Arc::clone(&state.db_pool));

    let mut data = repo.get_by_id(&id).await?.ok_or_else(|| {
        ApiError::from(Error::NotFound(format!("Movement data not found: {}", id)))
    })?;

    payload.apply(&mut data);

    let updated = repo.update(&data).await?;

    Ok(Json(updated))
}

async fn delete_data(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    policy::require_admin(&caller)?;

    let repo = MovementDataRepository::new(Arc::clone(&state.db_pool));

    let data = repo.get_by_id(&id).await?.ok_or_else(|| {
        ApiError::from(Error::NotFound(format!("Movement data not found: {}", id)))
    })?;

    repo.delete(&data.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_pattern(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<MovementPatternCreate>,
) -> ApiResult<(StatusCode, Json<MovementPattern>)> {
    policy::require_admin(&caller)?;

    let now = Utc::now();
    let pattern = MovementPattern {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        pattern_data: payload.pattern_data,
        created_at: now,
        updated_at: now,
    };

    let created = MovementPatternsRepository::new(Arc::clone(&state.db_pool))
        .create(&pattern)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_patterns(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<MovementPattern>>> {
    let patterns = MovementPatternsRepository::new(Arc::clone(&state.db_pool))
        .list(params.skip.unwrap_or(0), params.limit.unwrap_or(100))
        .await?;

    Ok(Json(patterns))
}

async fn get_pattern(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<MovementPattern>> {
    let pattern = MovementPatternsRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Pattern not found: {}", id))))?;

    Ok(Json(pattern))
}

async fn update_pattern(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MovementPatternUpdate>,
) -> ApiResult<Json<MovementPattern>> {
    policy::require_admin(&caller)?;

    let repo = MovementPatternsRepository::new(Arc::clone(&state.db_pool));

    let mut pattern = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Pattern not found: {}", id))))?;

    payload.apply(&mut pattern);

    let updated = repo.update(&pattern).await?;

    Ok(Json(updated))
}

async fn delete_pattern(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    policy::require_admin(&caller)?;

    let repo = MovementPatternsRepository::new(Arc::clone(&state.db_pool));

    let pattern = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Pattern not found: {}", id))))?;

    repo.delete(&pattern.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_detection(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(payload): Json<DetectedPatternCreate>,
) -> ApiResult<(StatusCode, Json<DetectedPattern>)> {
    let pattern = MovementPatternsRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(&payload.pattern_id)
        .await?
        .ok_or_else(|| {
            ApiError::from(Error::NotFound(format!(
                "Pattern not found: {}",
                payload.pattern_id
            )))
        })?;
    let event = load_event(&state, &payload.event_id).await?;

    let detection = DetectedPattern {
        id: Uuid::new_v4(),
        pattern_id: pattern.id,
        event_id: event.id,
        timestamp: Utc::now(),
        confidence: payload.confidence,
    };

    let created = DetectedPatternsRepository::new(Arc::clone(&state.db_pool))
        .create(&detection)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_detections(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<DetectionParams>,
) -> ApiResult<Json<Vec<DetectedPattern>>> {
    let detections = DetectedPatternsRepository::new(Arc::clone(&state.db_pool))
        .list(
            params.event_id,
            params.pattern_id,
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(detections))
}

async fn simulate(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(payload): Json<MovementSimulateRequest>,
) -> ApiResult<(StatusCode, Json<MovementData>)> {
    payload.validate()?;
    let event = load_event(&state, &payload.event_id).await?;

    let sample = Simulator::new(payload.seed).movement(payload.num_dancers);

    let data = MovementData {
        id: Uuid::new_v4(),
        event_id: event.id,
        timestamp: Utc::now(),
        data_type: sample.data_type.to_string(),
        coordinates: sample.coordinates,
        velocity: Some(sample.velocity),
        acceleration: None,
        crowd_density: Some(sample.crowd_density),
        movement_intensity: Some(sample.movement_intensity),
    };

    let created = MovementDataRepository::new(Arc::clone(&state.db_pool))
        .create(&data)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
