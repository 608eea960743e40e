use crate::api::rest::{load_event, load_user, ApiError, ApiResult, AppState};
use crate::db::models::event_models::{
    CheckinRequest, Event, EventCreate, EventUpdate, UserEvent, UserEventCreate, UserEventUpdate,
};
use crate::db::models::user_models::User;
use crate::db::repositories::events::EventsRepository;
use crate::db::repositories::registrations::RegistrationsRepository;
use crate::error::Error;
use crate::security::auth::CurrentUser;
use crate::security::policy;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chrono::Utc;
use log::info;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events).post(create_event))
        .route("/upcoming", get(upcoming_events))
        .route("/register", post(register))
        .route("/registrations", get(list_registrations))
        .route(
            "/registrations/:id",
            put(update_registration).delete(delete_registration),
        )
        .route("/checkin", post(checkin))
        .route("/checkout", post(checkout))
        .route("/:id", get(get_event).put(update_event).delete(delete_event))
}

#[derive(Debug, Deserialize)]
struct ListParams {
    is_active: Option<bool>,
    skip: Option<i64>,
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct UpcomingParams {
    days: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RegistrationParams {
    user_id: Option<Uuid>,
    event_id: Option<Uuid>,
    is_active: Option<bool>,
    skip: Option<i64>,
    limit: Option<i64>,
}

async fn list_events(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = EventsRepository::new(Arc::clone(&state.db_pool))
        .list(
            params.is_active,
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(events))
}

async fn create_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<EventCreate>,
) -> ApiResult<(StatusCode, Json<Event>)> {
    policy::require_admin(&caller)?;

    let now = Utc::now();
    let event = Event {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        location: payload.location,
        start_time: payload.start_time,
        end_time: payload.end_time,
        is_active: payload.is_active,
        max_capacity: payload.max_capacity,
        configuration: payload.configuration,
        created_at: now,
        updated_at: now,
    };

    let created = EventsRepository::new(Arc::clone(&state.db_pool))
        .create(&event)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn upcoming_events(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Query(params): Query<UpcomingParams>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = EventsRepository::new(Arc::clone(&state.db_pool))
        .upcoming(params.days.unwrap_or(30))
        .await?;

    Ok(Json(events))
}

async fn get_event(
    State(state): State<AppState>,
    CurrentUser(_): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Event>> {
    let event = load_event(&state, &id).await?;

    Ok(Json(event))
}

async fn update_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<EventUpdate>,
) -> ApiResult<Json<Event>> {
    policy::require_admin(&caller)?;

    let mut event = load_event(&state, &id).await?;
    payload.apply(&mut event);

    let updated = EventsRepository::new(Arc::clone(&state.db_pool))
        .update(&event)
        .await?;

    Ok(Json(updated))
}

async fn delete_event(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    policy::require_admin(&caller)?;

    let event = load_event(&state, &id).await?;
    EventsRepository::new(Arc::clone(&state.db_pool))
        .delete(&event.id)
        .await?;

    info!("Deleted event: {}", event.name);

    Ok(StatusCode::NO_CONTENT)
}

async fn register(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<UserEventCreate>,
) -> ApiResult<(StatusCode, Json<UserEvent>)> {
    let user = load_user(&state, &payload.user_id).await?;
    let event = load_event(&state, &payload.event_id).await?;
    policy::require_owner_or_admin(&caller, &user.id)?;

    let repo = RegistrationsRepository::new(Arc::clone(&state.db_pool));

    if repo.find_active(&user.id, &event.id).await?.is_some() {
        return Err(
            Error::AlreadyExists("User is already registered for this event".to_string()).into(),
        );
    }

    let registration = UserEvent {
        id: Uuid::new_v4(),
        user_id: user.id,
        event_id: event.id,
        registration_time: Utc::now(),
        checkin_time: None,
        checkout_time: None,
        is_active: true,
    };

    let created = repo.create(&registration).await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_registrations(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Query(params): Query<RegistrationParams>,
) -> ApiResult<Json<Vec<UserEvent>>> {
    let user_filter = policy::scope_user_filter(&caller, params.user_id);

    let registrations = RegistrationsRepository::new(Arc::clone(&state.db_pool))
        .list(
            user_filter,
            params.event_id,
            params.is_active,
            params.skip.unwrap_or(0),
            params.limit.unwrap_or(100),
        )
        .await?;

    Ok(Json(registrations))
}

async fn update_registration(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UserEventUpdate>,
) -> ApiResult<Json<UserEvent>> {
    let repo = RegistrationsRepository::new(Arc::clone(&state.db_pool));

    let mut registration = policy::authorize_owned(
        repo.get_by_id(&id).await?,
        &caller,
        |r: &UserEvent| r.user_id,
        "Registration",
        &id,
    )?;

    payload.apply(&mut registration);

    let updated = repo.update(&registration).await?;

    Ok(Json(updated))
}

async fn delete_registration(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let repo = RegistrationsRepository::new(Arc::clone(&state.db_pool));

    let registration = policy::authorize_owned(
        repo.get_by_id(&id).await?,
        &caller,
        |r: &UserEvent| r.user_id,
        "Registration",
        &id,
    )?;

    repo.delete(&registration.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

enum Stamp {
    Checkin,
    Checkout,
}

/// Stamp the check-in or check-out time on the caller's active
/// registration. A repeated check-in overwrites the previous stamp, and
/// checking out does not close the registration.
async fn stamp_registration(
    state: &AppState,
    caller: &User,
    payload: &CheckinRequest,
    stamp: Stamp,
) -> ApiResult<Json<UserEvent>> {
    let user_id = payload.user_id.unwrap_or(caller.id);
    let user = load_user(state, &user_id).await?;
    let event = load_event(state, &payload.event_id).await?;
    policy::require_owner_or_admin(caller, &user.id)?;

    let repo = RegistrationsRepository::new(Arc::clone(&state.db_pool));

    let mut registration = repo
        .find_active(&user.id, &event.id)
        .await?
        .ok_or_else(|| {
            ApiError::from(Error::NotFound(
                "No active registration for this event".to_string(),
            ))
        })?;

    match stamp {
        Stamp::Checkin => registration.checkin_time = Some(Utc::now()),
        Stamp::Checkout => registration.checkout_time = Some(Utc::now()),
    }

    let updated = repo.update(&registration).await?;

    Ok(Json(updated))
}

async fn checkin(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<CheckinRequest>,
) -> ApiResult<Json<UserEvent>> {
    stamp_registration(&state, &caller, &payload, Stamp::Checkin).await
}

async fn checkout(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Json(payload): Json<CheckinRequest>,
) -> ApiResult<Json<UserEvent>> {
    stamp_registration(&state, &caller, &payload, Stamp::Checkout).await
}
