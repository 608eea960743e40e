use crate::{db::models::event_models::Event, error::Error};
use anyhow::Result;
use chrono::{Duration, Utc};
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, name, description, location, start_time, end_time, is_active, \
                             max_capacity, configuration, created_at, updated_at";

/// Events repository for handling event operations
#[derive(Clone)]
pub struct EventsRepository {
    pool: Arc<PgPool>,
}

impl EventsRepository {
    /// Create a new events repository
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new event
    pub async fn create(&self, event: &Event) -> Result<Event> {
        info!("Creating new event: {}", event.name);

        let result = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (
                id, name, description, location, start_time, end_time, is_active,
                max_capacity, configuration, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, name, description, location, start_time, end_time, is_active,
                      max_capacity, configuration, created_at, updated_at
            "#,
        )
        .bind(event.id)
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.is_active)
        .bind(event.max_capacity)
        .bind(&event.configuration)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create event: {}", e)))?;

        Ok(result)
    }

    /// Get event by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<Event>> {
        let result = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get event by ID: {}", e)))?;

        Ok(result)
    }

    /// List events, optionally filtered by active status
    pub async fn list(&self, is_active: Option<bool>, skip: i64, limit: i64) -> Result<Vec<Event>> {
        let mut query = QueryBuilder::new(format!("SELECT {EVENT_COLUMNS} FROM events WHERE 1=1"));

        if let Some(is_active) = is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }

        query.push(" ORDER BY start_time");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<Event>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list events: {}", e)))?;

        Ok(result)
    }

    /// Get events starting within the next `days` days, soonest first
    pub async fn upcoming(&self, days: i64) -> Result<Vec<Event>> {
        let now = Utc::now();
        let end_date = now + Duration::days(days);

        let result = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS}
            FROM events
            WHERE start_time >= $1 AND start_time <= $2
            ORDER BY start_time
            "#
        ))
        .bind(now)
        .bind(end_date)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get upcoming events: {}", e)))?;

        Ok(result)
    }

    /// Update event
    pub async fn update(&self, event: &Event) -> Result<Event> {
        let result = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET name = $1, description = $2, location = $3, start_time = $4, end_time = $5,
                is_active = $6, max_capacity = $7, configuration = $8, updated_at = $9
            WHERE id = $10
            RETURNING id, name, description, location, start_time, end_time, is_active,
                      max_capacity, configuration, created_at, updated_at
            "#,
        )
        .bind(&event.name)
        .bind(&event.description)
        .bind(&event.location)
        .bind(event.start_time)
        .bind(event.end_time)
        .bind(event.is_active)
        .bind(event.max_capacity)
        .bind(&event.configuration)
        .bind(Utc::now())
        .bind(event.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update event: {}", e)))?;

        Ok(result)
    }

    /// Delete event
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete event: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
