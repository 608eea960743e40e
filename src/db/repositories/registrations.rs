use crate::{db::models::event_models::UserEvent, error::Error};
use anyhow::Result;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const REGISTRATION_COLUMNS: &str =
    "id, user_id, event_id, registration_time, checkin_time, checkout_time, is_active";

/// Repository for event registrations (user_events)
#[derive(Clone)]
pub struct RegistrationsRepository {
    pool: Arc<PgPool>,
}

impl RegistrationsRepository {
    /// Create a new registrations repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new registration
    pub async fn create(&self, registration: &UserEvent) -> Result<UserEvent> {
        info!(
            "Registering user {} for event {}",
            registration.user_id, registration.event_id
        );

        let result = sqlx::query_as::<_, UserEvent>(
            r#"
            INSERT INTO user_events (
                id, user_id, event_id, registration_time, checkin_time, checkout_time, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, event_id, registration_time, checkin_time, checkout_time, is_active
            "#,
        )
        .bind(registration.id)
        .bind(registration.user_id)
        .bind(registration.event_id)
        .bind(registration.registration_time)
        .bind(registration.checkin_time)
        .bind(registration.checkout_time)
        .bind(registration.is_active)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match &e {
            // The partial unique index caught a concurrent duplicate
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                Error::AlreadyExists("User is already registered for this event".to_string())
            }
            _ => Error::Database(format!("Failed to create registration: {}", e)),
        })?;

        Ok(result)
    }

    /// Get registration by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<UserEvent>> {
        let result = sqlx::query_as::<_, UserEvent>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM user_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get registration by ID: {}", e)))?;

        Ok(result)
    }

    /// Find the active registration for a (user, event) pair
    pub async fn find_active(&self, user_id: &Uuid, event_id: &Uuid) -> Result<Option<UserEvent>> {
        let result = sqlx::query_as::<_, UserEvent>(&format!(
            r#"
            SELECT {REGISTRATION_COLUMNS}
            FROM user_events
            WHERE user_id = $1 AND event_id = $2 AND is_active
            "#
        ))
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to find active registration: {}", e)))?;

        Ok(result)
    }

    /// List registrations with optional filters
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
        is_active: Option<bool>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<UserEvent>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {REGISTRATION_COLUMNS} FROM user_events WHERE 1=1"
        ));

        if let Some(user_id) = user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(event_id) = event_id {
            query.push(" AND event_id = ").push_bind(event_id);
        }
        if let Some(is_active) = is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }

        query.push(" ORDER BY registration_time DESC");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<UserEvent>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list registrations: {}", e)))?;

        Ok(result)
    }

    /// Update registration
    pub async fn update(&self, registration: &UserEvent) -> Result<UserEvent> {
        let result = sqlx::query_as::<_, UserEvent>(
            r#"
            UPDATE user_events
            SET checkin_time = $1, checkout_time = $2, is_active = $3
            WHERE id = $4
            RETURNING id, user_id, event_id, registration_time, checkin_time, checkout_time, is_active
            "#,
        )
        .bind(registration.checkin_time)
        .bind(registration.checkout_time)
        .bind(registration.is_active)
        .bind(registration.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update registration: {}", e)))?;

        Ok(result)
    }

    /// Delete registration
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM user_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete registration: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
