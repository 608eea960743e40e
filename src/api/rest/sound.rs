use crate::api::rest::{load_event, load_user, ApiError, ApiResult, AppState};
use crate::db::models::sound_models::{
    SongSelection, SongSelectionCreate, SongSelectionUpdate, SoundEvent, SoundEventCreate,
    SoundEventUpdate, SoundPreset, SoundPresetCreate, SoundPresetUpdate, SoundSample,
    SoundSampleCreate, SoundSimulateRequest,
};
use crate::db::models::user_models::User;
use crate::db::repositories::movement::MovementDataRepository;
use crate::db::repositories::sound::{
    SongSelectionsRepository, SoundEventsRepository, SoundPresetsRepository,
    SoundSamplesRepository,
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
        .route("/events", post(create_sound_event).get(list_sound_events))
        .route(
            "/events/:id",
            get(get_sound_event)
                .put(update_sound_event)
                .delete(delete_sound_event),
        )
        .route("/songs", post(create_song).get(list_songs))
        .route("/songs/:id", get(get_song).put(update_song).delete(delete_song))
        .route("/presets", post(create_preset).get(list_presets))
        .route(
            "/presets/:id",
            get(get_preset).put(update_preset).delete(delete_preset),
        )
        .route("/samples", post(create_sample).get(list_samples))
        .route("/samples/:id", get(get_sample).delete(delete_sample))
        .route("/simulate", post(simulate))
}

#[derive(Debug, Deserialize)]
struct SoundEventParams {
    event_id: Option<Uuid>,
    sound_type: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SongParams {
    user_id: Option<Uuid>,
    event_id: Option<Uuid>,
    is_approved: Option<bool>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct SampleParams {
    category: Option<String>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ListParams {
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn load_movement_data(state: &AppState, id: &Uuid) -> ApiResult<()> {
    MovementDataRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(id)
        .await?
        .ok_or_else(|| {
            ApiError::from(Error::NotFound(format!("Movement data not found: {}", id)))
        })?;

    Ok(())
}

async fn create_sound_event(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(payload): Json<SoundEventCreate>,
) -> ApiResult<(StatusCode, Json<SoundEvent>)> {
    let event = load_event(&state, &payload.event_id).await?;
    if let Some(movement_data_id) = &payload.movement_data_id {
        load_movement_data(&state, movement_data_id).await?;
    }

    let sound_event = SoundEvent {
        id: Uuid::new_v4(),
        event_id: event.id,
        movement_data_id: payload.movement_data_id,
        timestamp: Utc::now(),
        sound_type: payload.sound_type,
        parameters: payload.parameters,
        duration: payload.duration,
        intensity: payload.intensity,
    };

    let created = SoundEventsRepository::new(Arc::clone(&state.db_pool))
        .create(&sound_event)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_sound_events(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<SoundEventParams>,
) -> ApiResult<Json<Vec<SoundEvent>>> {
    let sound_events = SoundEventsRepository::new(Arc::clone(&state.db_pool))
        .list(
            params.event_id,
            params.sound_type.as_deref(),
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(sound_events))
}

async fn get_sound_event(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SoundEvent>> {
    let sound_event = SoundEventsRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Sound event not found: {}", id))))?;

    Ok(Json(sound_event))
}

async fn update_sound_event(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SoundEventUpdate>,
) -> ApiResult<Json<SoundEvent>> {
    let repo = SoundEventsRepository::new(Arc::clone(&state.db_pool));

    let mut sound_event = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Sound event not found: {}", id))))?;

    payload.apply(&mut sound_event);

    let updated = repo.update(&sound_event).await?;

    Ok(Json(updated))
}

async fn delete_sound_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    policy::require_admin(&caller)?;

    let repo = SoundEventsRepository::new(Arc::clone(&state.db_pool));

    let sound_event = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Sound event not found: {}", id))))?;

    repo.delete(&sound_event.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_song(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<SongSelectionCreate>,
) -> ApiResult<(StatusCode, Json<SongSelection>)> {
    let user = load_user(&state, &payload.user_id).await?;
    let event = load_event(&state, &payload.event_id).await?;
    policy::require_owner_or_admin(&caller, &user.id)?;

    let song = SongSelection {
        id: Uuid::new_v4(),
        user_id: user.id,
        event_id: event.id,
        song_title: payload.song_title,
        artist: payload.artist,
        duration: payload.duration,
        audio_features: payload.audio_features,
        // Every request starts unapproved
        is_approved: false,
        created_at: Utc::now(),
    };

    let created = SongSelectionsRepository::new(Arc::clone(&state.db_pool))
        .create(&song)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_songs(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<SongParams>,
) -> ApiResult<Json<Vec<SongSelection>>> {
    let user_filter = policy::scope_user_filter(&caller, params.user_id);

    let songs = SongSelectionsRepository::new(Arc::clone(&state.db_pool))
        .list(
            user_filter,
            params.event_id,
            params.is_approved,
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(songs))
}

async fn get_song(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SongSelection>> {
    let song = policy::authorize_owned(
        SongSelectionsRepository::new(Arc::clone(&state.db_pool))
            .get_by_id(&id)
            .await?,
        &caller,
        |s: &SongSelection| s.user_id,
        "Song selection",
        &id,
    )?;

    Ok(Json(song))
}

/// Approval is an admin decision; the whole update is rejected before
/// any field is merged.
fn approval_requires_admin(caller: &User, payload: &SongSelectionUpdate) -> Result<(), Error> {
    if payload.is_approved.is_some() {
        policy::require_admin(caller)?;
    }
    Ok(())
}

async fn update_song(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SongSelectionUpdate>,
) -> ApiResult<Json<SongSelection>> {
    let repo = SongSelectionsRepository::new(Arc::clone(&state.db_pool));

    let mut song = policy::authorize_owned(
        repo.get_by_id(&id).await?,
        &caller,
        |s: &SongSelection| s.user_id,
        "Song selection",
        &id,
    )?;

    approval_requires_admin(&caller, &payload)?;

    payload.apply(&mut song);

    let updated = repo.update(&song).await?;

    Ok(Json(updated))
}

async fn delete_song(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = SongSelectionsRepository::new(Arc::clone(&state.db_pool));

    let song = policy::authorize_owned(
        repo.get_by_id(&id).await?,
        &caller,
        |s: &SongSelection| s.user_id,
        "Song selection",
        &id,
    )?;

    repo.delete(&song.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_preset(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<SoundPresetCreate>,
) -> ApiResult<(StatusCode, Json<SoundPreset>)> {
    policy::require_admin(&caller)?;

    let now = Utc::now();
    let preset = SoundPreset {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        parameters: payload.parameters,
        created_at: now,
        updated_at: now,
    };

    let created = SoundPresetsRepository::new(Arc::clone(&state.db_pool))
        .create(&preset)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_presets(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<SoundPreset>>> {
    let presets = SoundPresetsRepository::new(Arc::clone(&state.db_pool))
        .list(params.skip.unwrap_or(0), params.limit.unwrap_or(100))
        .await?;

    Ok(Json(presets))
}

async fn get_preset(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SoundPreset>> {
    let preset = SoundPresetsRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Preset not found: {}", id))))?;

    Ok(Json(preset))
}

async fn update_preset(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SoundPresetUpdate>,
) -> ApiResult<Json<SoundPreset>> {
    policy::require_admin(&caller)?;

    let repo = SoundPresetsRepository::new(Arc::clone(&state.db_pool));

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

    let repo = SoundPresetsRepository::new(Arc::clone(&state.db_pool));

    let preset = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Preset not found: {}", id))))?;

    repo.delete(&preset.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn create_sample(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<SoundSampleCreate>,
) -> ApiResult<(StatusCode, Json<SoundSample>)> {
    policy::require_admin(&caller)?;

    let sample = SoundSample {
        id: Uuid::new_v4(),
        name: payload.name,
        category: payload.category,
        sample_data: payload.sample_data,
        duration: payload.duration,
        sample_rate: payload.sample_rate,
        created_at: Utc::now(),
    };

    let created = SoundSamplesRepository::new(Arc::clone(&state.db_pool))
        .create(&sample)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_samples(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<SampleParams>,
) -> ApiResult<Json<Vec<SoundSample>>> {
    let samples = SoundSamplesRepository::new(Arc::clone(&state.db_pool))
        .list(
            params.category.as_deref(),
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(samples))
}

async fn get_sample(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SoundSample>> {
    let sample = SoundSamplesRepository::new(Arc::clone(&state.db_pool))
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Sample not found: {}", id))))?;

    Ok(Json(sample))
}

async fn delete_sample(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    policy::require_admin(&caller)?;

    let repo = SoundSamplesRepository::new(Arc::clone(&state.db_pool));

    let sample = repo
        .get_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::from(Error::NotFound(format!("Sample not found: {}", id))))?;

    repo.delete(&sample.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

async fn simulate(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Json(payload): Json<SoundSimulateRequest>,
) -> ApiResult<(StatusCode, Json<SoundEvent>)> {
    let event = load_event(&state, &payload.event_id).await?;
    if let Some(movement_data_id) = &payload.movement_data_id {
        load_movement_data(&state, movement_data_id).await?;
    }

    let sample = Simulator::new(payload.seed).sound();

    let sound_event = SoundEvent {
        id: Uuid::new_v4(),
        event_id: event.id,
        movement_data_id: payload.movement_data_id,
        timestamp: Utc::now(),
        sound_type: sample.sound_type.to_string(),
        parameters: sample.parameters,
        duration: sample.duration,
        intensity: sample.intensity,
    };

    let created = SoundEventsRepository::new(Arc::clone(&state.db_pool))
        .create(&sound_event)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(is_admin: bool) -> User {
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
    fn non_admin_cannot_touch_approval() {
        let caller = user(false);
        let payload = SongSelectionUpdate {
            is_approved: Some(true),
            ..Default::default()
        };
        let result = approval_requires_admin(&caller, &payload);
        assert!(matches!(result, Err(Error::Authorization(_))));
    }

    #[test]
    fn non_admin_may_update_other_fields() {
        let caller = user(false);
        let payload = SongSelectionUpdate {
            song_title: Some("Pulse".to_string()),
            ..Default::default()
        };
        assert!(approval_requires_admin(&caller, &payload).is_ok());
    }

    #[test]
    fn admin_may_approve() {
        let admin = user(true);
        let payload = SongSelectionUpdate {
            is_approved: Some(true),
            ..Default::default()
        };
        assert!(approval_requires_admin(&admin, &payload).is_ok());
    }
}
