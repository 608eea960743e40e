use crate::{
    db::models::visualization_models::{VisualizationEvent, VisualizationPreset},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

const EVENT_COLUMNS: &str =
    "id, event_id, timestamp, visualization_type, parameters, duration, intensity";

const PRESET_COLUMNS: &str = "id, name, description, parameters, created_at, updated_at";

/// Repository for generated visualization events
#[derive(Clone)]
pub struct VisualizationEventsRepository {
    pool: Arc<PgPool>,
}

impl VisualizationEventsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new visualization event
    pub async fn create(&self, visualization_event: &VisualizationEvent) -> Result<VisualizationEvent> {
        let result = sqlx::query_as::<_, VisualizationEvent>(
            r#"
            INSERT INTO visualization_events (
                id, event_id, timestamp, visualization_type, parameters, duration, intensity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, event_id, timestamp, visualization_type, parameters, duration, intensity
            "#,
        )
        .bind(visualization_event.id)
        .bind(visualization_event.event_id)
        .bind(visualization_event.timestamp)
        .bind(&visualization_event.visualization_type)
        .bind(&visualization_event.parameters)
        .bind(visualization_event.duration)
        .bind(visualization_event.intensity)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create visualization event: {}", e)))?;

        Ok(result)
    }

    /// Get visualization event by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<VisualizationEvent>> {
        let result = sqlx::query_as::<_, VisualizationEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM visualization_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get visualization event by ID: {}", e)))?;

        Ok(result)
    }

    /// List visualization events with optional filters
    pub async fn list(
        &self,
        event_id: Option<Uuid>,
        visualization_type: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<VisualizationEvent>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {EVENT_COLUMNS} FROM visualization_events WHERE 1=1"
        ));

        if let Some(event_id) = event_id {
            query.push(" AND event_id = ").push_bind(event_id);
        }
        if let Some(visualization_type) = visualization_type {
            query
                .push(" AND visualization_type = ")
                .push_bind(visualization_type.to_string());
        }

        query.push(" ORDER BY timestamp DESC");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<VisualizationEvent>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list visualization events: {}", e)))?;

        Ok(result)
    }

    /// Update visualization event
    pub async fn update(&self, visualization_event: &VisualizationEvent) -> Result<VisualizationEvent> {
        let result = sqlx::query_as::<_, VisualizationEvent>(
            r#"
            UPDATE visualization_events
            SET visualization_type = $1, parameters = $2, duration = $3, intensity = $4
            WHERE id = $5
            RETURNING id, event_id, timestamp, visualization_type, parameters, duration, intensity
            "#,
        )
        .bind(&visualization_event.visualization_type)
        .bind(&visualization_event.parameters)
        .bind(visualization_event.duration)
        .bind(visualization_event.intensity)
        .bind(visualization_event.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update visualization event: {}", e)))?;

        Ok(result)
    }

    /// Delete visualization event
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM visualization_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete visualization event: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for visualization presets
#[derive(Clone)]
pub struct VisualizationPresetsRepository {
    pool: Arc<PgPool>,
}

impl VisualizationPresetsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new preset
    pub async fn create(&self, preset: &VisualizationPreset) -> Result<VisualizationPreset> {
        let result = sqlx::query_as::<_, VisualizationPreset>(
            r#"
            INSERT INTO visualization_presets (id, name, description, parameters, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, parameters, created_at, updated_at
            "#,
        )
        .bind(preset.id)
        .bind(&preset.name)
        .bind(&preset.description)
        .bind(&preset.parameters)
        .bind(preset.created_at)
        .bind(preset.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create visualization preset: {}", e)))?;

        Ok(result)
    }

    /// Get preset by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<VisualizationPreset>> {
        let result = sqlx::query_as::<_, VisualizationPreset>(&format!(
            "SELECT {PRESET_COLUMNS} FROM visualization_presets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get visualization preset by ID: {}", e)))?;

        Ok(result)
    }

    /// List all presets
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<VisualizationPreset>> {
        let result = sqlx::query_as::<_, VisualizationPreset>(&format!(
            "SELECT {PRESET_COLUMNS} FROM visualization_presets ORDER BY name OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list visualization presets: {}", e)))?;

        Ok(result)
    }

    /// Update preset
    pub async fn update(&self, preset: &VisualizationPreset) -> Result<VisualizationPreset> {
        let result = sqlx::query_as::<_, VisualizationPreset>(
            r#"
            UPDATE visualization_presets
            SET name = $1, description = $2, parameters = $3, updated_at = $4
            WHERE id = $5
            RETURNING id, name, description, parameters, created_at, updated_at
            "#,
        )
        .bind(&preset.name)
        .bind(&preset.description)
        .bind(&preset.parameters)
        .bind(Utc::now())
        .bind(preset.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update visualization preset: {}", e)))?;

        Ok(result)
    }

    /// Delete preset
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM visualization_presets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete visualization preset: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
