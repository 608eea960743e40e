use crate::db::migrations;
use crate::db::models::event_models::{Event, UserEvent};
use crate::db::models::user_models::User;
use crate::db::repositories::events::EventsRepository;
use crate::db::repositories::registrations::RegistrationsRepository;
use crate::db::repositories::users::UsersRepository;
use crate::error::Error;
use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

async fn test_pool() -> Result<Option<Arc<PgPool>>> {
    // Skip when no database is available
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            println!("Skipping database test. Set TEST_DATABASE_URL to run.");
            return Ok(None);
        }
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await?;
    migrations::run_migrations(&pool).await?;

    Ok(Some(Arc::new(pool)))
}

fn sample_user() -> User {
    let tag = Uuid::new_v4().simple().to_string();
    User {
        id: Uuid::new_v4(),
        email: format!("{}@codance.test", tag),
        username: format!("dancer-{}", tag),
        password_hash: "hash".to_string(),
        is_active: true,
        is_admin: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn sample_event() -> Event {
    let now = Utc::now();
    Event {
        id: Uuid::new_v4(),
        name: format!("Test event {}", Uuid::new_v4().simple()),
        description: None,
        location: "Main hall".to_string(),
        start_time: now + Duration::hours(1),
        end_time: now + Duration::hours(4),
        is_active: true,
        max_capacity: Some(200),
        configuration: None,
        created_at: now,
        updated_at: now,
    }
}

fn sample_registration(user_id: Uuid, event_id: Uuid) -> UserEvent {
    UserEvent {
        id: Uuid::new_v4(),
        user_id,
        event_id,
        registration_time: Utc::now(),
        checkin_time: None,
        checkout_time: None,
        is_active: true,
    }
}

#[tokio::test]
async fn user_crud_round_trip() -> Result<()> {
    let pool = match test_pool().await? {
        Some(pool) => pool,
        None => return Ok(()),
    };
    let repo = UsersRepository::new(pool);

    let user = sample_user();
    let created = repo.create(&user).await?;
    assert_eq!(created.username, user.username);

    let fetched = repo.get_by_username(&user.username).await?;
    assert_eq!(fetched.map(|u| u.id), Some(created.id));

    assert!(repo.delete(&created.id).await?);
    assert!(repo.get_by_id(&created.id).await?.is_none());

    Ok(())
}

#[tokio::test]
async fn deactivated_registration_frees_the_slot() -> Result<()> {
    let pool = match test_pool().await? {
        Some(pool) => pool,
        None => return Ok(()),
    };
    let users = UsersRepository::new(Arc::clone(&pool));
    let events = EventsRepository::new(Arc::clone(&pool));
    let registrations = RegistrationsRepository::new(Arc::clone(&pool));

    let user = users.create(&sample_user()).await?;
    let event = events.create(&sample_event()).await?;

    let mut registration = registrations
        .create(&sample_registration(user.id, event.id))
        .await?;

    assert!(registrations
        .find_active(&user.id, &event.id)
        .await?
        .is_some());

    registration.is_active = false;
    registrations.update(&registration).await?;

    assert!(registrations
        .find_active(&user.id, &event.id)
        .await?
        .is_none());

    registrations.delete(&registration.id).await?;
    events.delete(&event.id).await?;
    users.delete(&user.id).await?;

    Ok(())
}

#[tokio::test]
async fn duplicate_active_registration_is_rejected() -> Result<()> {
    let pool = match test_pool().await? {
        Some(pool) => pool,
        None => return Ok(()),
    };
    let users = UsersRepository::new(Arc::clone(&pool));
    let events = EventsRepository::new(Arc::clone(&pool));
    let registrations = RegistrationsRepository::new(Arc::clone(&pool));

    let user = users.create(&sample_user()).await?;
    let event = events.create(&sample_event()).await?;

    let first = registrations
        .create(&sample_registration(user.id, event.id))
        .await?;
    assert!(registrations
        .find_active(&user.id, &event.id)
        .await?
        .is_some());

    // The partial unique index rejects a second active row for the pair
    let err = registrations
        .create(&sample_registration(user.id, event.id))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::AlreadyExists(_))
    ));

    registrations.delete(&first.id).await?;
    events.delete(&event.id).await?;
    users.delete(&user.id).await?;

    Ok(())
}

#[tokio::test]
async fn checkin_stamps_and_checkout_keeps_registration_open() -> Result<()> {
    let pool = match test_pool().await? {
        Some(pool) => pool,
        None => return Ok(()),
    };
    let users = UsersRepository::new(Arc::clone(&pool));
    let events = EventsRepository::new(Arc::clone(&pool));
    let registrations = RegistrationsRepository::new(Arc::clone(&pool));

    let user = users.create(&sample_user()).await?;
    let event = events.create(&sample_event()).await?;

    // Before registering there is nothing to check in against
    assert!(registrations
        .find_active(&user.id, &event.id)
        .await?
        .is_none());

    let mut registration = registrations
        .create(&sample_registration(user.id, event.id))
        .await?;

    registration.checkin_time = Some(Utc::now());
    registrations.update(&registration).await?;
    let stamped = registrations
        .find_active(&user.id, &event.id)
        .await?
        .expect("registration stays active after check-in");
    let first_checkin = stamped.checkin_time.expect("check-in time stamped");

    // A repeated check-in overwrites the earlier stamp
    registration.checkin_time = Some(Utc::now());
    registrations.update(&registration).await?;
    let restamped = registrations
        .find_active(&user.id, &event.id)
        .await?
        .expect("registration stays active after re-check-in");
    assert!(restamped.checkin_time.expect("check-in time stamped") >= first_checkin);

    // Checking out stamps the time without closing the registration
    registration.checkout_time = Some(Utc::now());
    registrations.update(&registration).await?;
    let checked_out = registrations
        .find_active(&user.id, &event.id)
        .await?
        .expect("registration stays active after checkout");
    assert!(checked_out.checkin_time.is_some());
    assert!(checked_out.checkout_time.is_some());
    assert!(checked_out.is_active);

    registrations.delete(&registration.id).await?;
    events.delete(&event.id).await?;
    users.delete(&user.id).await?;

    Ok(())
}
