use crate::api::rest::{load_event, ApiError, ApiResult, AppState};
use crate::db::models::visualization_models::{
    VisualizationEvent, VisualizationEventCreate, VisualizationEventUpdate, VisualizationPreset,
    VisualizationPresetCreate, VisualizationPresetUpdate, VisualizationSimulateRequest,
};
use crate::db::repositories::visualization::{
    VisualizationEventsRepository, VisualizationPresetsRepository,
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
        .route("/events", post(create_event).get(list_events))
        .route(
            "/events/:id",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/presets", post(create_preset).get(list_presets))
        .route(
            "/presets/:id",
            get(get_preset).put(update_preset).delete(delete_preset),
        )
        .route("/simulate", post(simulate))
}

#[derive(Debug, Deserialize)]
struct EventParams {
    event_id: Option<Uuid>,
    visualization_type: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn create_event(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(payload): Json<VisualizationEventCreate>,
) -> ApiResult<(StatusCode, Json<VisualizationEvent>)> {
    let event = load_event(&state, &payload.event_id).await?;

    let visualization_event = VisualizationEvent {
        id: Uuid::new_v4(),
        event_id: event.id,
        timestamp: Utc::now(),
        visualization_type: payload.visualization_type,
        parameters: payload.parameters,
        duration: payload.duration,
        intensity: payload.intensity,
    };

    let created = VisualizationEventsRepository::new(Arc::clone(&state.db_pool))
        .create(&visualization_event)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_events(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<EventParams>,
) -> ApiResult<Json<Vec<VisualizationEvent>>> {
    let events = VisualizationEventsRepository::new(Arc::clone(&state.db_pool))
        .list(
            params.event_id,
            params.visualization_type.as_deref(),
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(events))
}

async fn get_event(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VisualizationEvent>> {
    let visualization_event = VisualizationEventsRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(&id)
        .await?
        .ok_or_else(|| {
            ApiError::from(Error::NotFound(format!(
                "Visualization event not found: {}",
                id
            )))
        })?;

    Ok(Json(visualization_event))
}

async fn update_event(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisualizationEventUpdate>,
) -> ApiResult<Json<VisualizationEvent>> {
    let repo = VisualizationEventsRepository::new(Arc::clone(&state.db_pool));

    let mut visualization_event = repo.get_by_id(&id).await?.ok_or_else(|| {
        ApiError::from(Error::NotFound(format!(
            "Visualization event not found: {}",
            id
        )))
    })?;

    payload.apply(&mut visualization_event);

    let updated = repo.update(&visualization_event).await?;

    Ok(Json(updated))
}

async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    policy::require_admin(&caller)?;

    let repo = VisualizationEventsRepository::new(Arc::clone(&state.db_pool));

    let visualization_event = repo.get_by_id(&id).await?.ok_or_else(|| {
        ApiError::from(Error::NotFound(format!(
            "Visualization event not found: {}",
            id
        )))
    })?;

    repo.delete(&visualization_event.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_preset(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<VisualizationPresetCreate>,
) -> ApiResult<(StatusCode, Json<VisualizationPreset>)> {
    policy::require_admin(&caller)?;

    let now = Utc::now();
    let preset = VisualizationPreset {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        parameters: payload.parameters,
        created_at: now,
        updated_at: now,
    };

    let created = VisualizationPresetsRepository::new(Arc::clone(&state.db_pool))
        .create(&preset)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_presets(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<VisualizationPreset>>> {
    let presets = VisualizationPresetsRepository::new(Arc::clone(&state.db_pool))
        .list(params.skip.unwrap_or(0), params.limit.unwrap_or(100))
        .await?;

    Ok(Json(presets))
}

async fn get_preset(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<VisualizationPreset>> {
    let preset = VisualizationPresetsRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Preset not found: {}", id))))?;

    Ok(Json(preset))
}

async fn update_preset(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<VisualizationPresetUpdate>,
) -> ApiResult<Json<VisualizationPreset>> {
    policy::require_admin(&caller)?;

    let repo = VisualizationPresetsRepository::new(Arc::clone(&state.db_pool));

    let mut preset = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Preset not found: {}", id))))?;

    payload.apply(&mut preset);

    let updated = repo.update(&preset).await?;

    Ok(Json(updated))
}

async fn delete_preset(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    policy::require_admin(&caller)?;

    let repo = VisualizationPresetsRepository::new(Arc::clone(&state.db_pool));

    let preset = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Preset not found: {}", id))))?;

    repo.delete(&preset.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn simulate(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(payload): Json<VisualizationSimulateRequest>,
) -> ApiResult<(StatusCode, Json<VisualizationEvent>)> {
    let event = load_event(&state, &payload.event_id).await?;

    let sample = Simulator::new(payload.seed).visualization();

    let visualization_event = VisualizationEvent {
        id: Uuid::new_v4(),
        event_id: event.id,
        timestamp: Utc::now(),
        visualization_type: sample.visualization_type.to_string(),
        parameters: sample.parameters,
        duration: sample.duration,
        intensity: sample.intensity,
    };

    let created = VisualizationEventsRepository::new(Arc::clone(&state.db_pool))
        .create(&visualization_event)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}
