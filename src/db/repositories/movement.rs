use crate::{
    db::models::movement_models::{DetectedPattern, MovementData, MovementPattern},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

const DATA_COLUMNS: &str = "id, event_id, timestamp, data_type, coordinates, velocity, \
                            acceleration, crowd_density, movement_intensity";

const PATTERN_COLUMNS: &str = "id, name, description, pattern_data, created_at, updated_at";

const DETECTED_COLUMNS: &str = "id, pattern_id, event_id, timestamp, confidence";

/// Repository for crowd movement samples
#[derive(Clone)]
pub struct MovementDataRepository {
    pool: Arc<PgPool>,
}

impl MovementDataRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new movement sample
    pub async fn create(&self, data: &MovementData) -> Result<MovementData> {
        let result = sqlx::query_as::<_, MovementData>(
            r#"
            INSERT INTO movement_data (
                id, event_id, timestamp, data_type, coordinates, velocity,
                acceleration, crowd_density, movement_intensity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, event_id, timestamp, data_type, coordinates, velocity,
                      acceleration, crowd_density, movement_intensity
            "#,
        )
        .bind(data.id)
        .bind(data.event_id)
        .bind(data.timestamp)
        .bind(&data.data_type)
        .bind(&data.coordinates)
        .bind(data.velocity)
        .bind(data.acceleration)
        .bind(data.crowd_density)
        .bind(data.movement_intensity)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create movement data: {}", e)))?;

        Ok(result)
    }

    /// Get movement sample by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<MovementData>> {
        let result = sqlx::query_as::<_, MovementData>(&format!(
            "SELECT {DATA_COLUMNS} FROM movement_data WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get movement data by ID: {}", e)))?;

        Ok(result)
    }

    /// List movement samples, optionally filtered by event
    pub async fn list(
        &self,
        event_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<MovementData>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {DATA_COLUMNS} FROM movement_data WHERE 1=1"
        ));

        if let Some(event_id) = event_id {
            query.push(" AND event_id = ").push_bind(event_id);
        }

        query.push(" ORDER BY timestamp DESC");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<MovementData>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list movement data: {}", e)))?;

        Ok(result)
    }

    /// Update movement sample
    pub async fn update(&self, data: &MovementData) -> Result<MovementData> {
        let result = sqlx::query_as::<_, MovementData>(
            r#"
            UPDATE movement_data
            SET data_type = $1, coordinates = $2, velocity = $3, acceleration = $4,
                crowd_density = $5, movement_intensity = $6
            WHERE id = $7
            RETURNING id, event_id, timestamp, data_type, coordinates, velocity,
                      acceleration, crowd_density, movement_intensity
            "#,
        )
        .bind(&data.data_type)
        .bind(&data.coordinates)
        .bind(data.velocity)
        .bind(data.acceleration)
        .bind(data.crowd_density)
        .bind(data.movement_intensity)
        .bind(data.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update movement data: {}", e)))?;

        Ok(result)
    }

    /// Delete movement sample
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM movement_data
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete movement data: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for movement pattern templates
#[derive(Clone)]
pub struct MovementPatternsRepository {
    pool: Arc<PgPool>,
}

impl MovementPatternsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new pattern
    pub async fn create(&self, pattern: &MovementPattern) -> Result<MovementPattern> {
        let result = sqlx::query_as::<_, MovementPattern>(
            r#"
            INSERT INTO movement_patterns (id, name, description, pattern_data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, pattern_data, created_at, updated_at
            "#,
        )
        .bind(pattern.id)
        .bind(&pattern.name)
        .bind(&pattern.description)
        .bind(&pattern.pattern_data)
        .bind(pattern.created_at)
        .bind(pattern.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create movement pattern: {}", e)))?;

        Ok(result)
    }

    /// Get pattern by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<MovementPattern>> {
        let result = sqlx::query_as::<_, MovementPattern>(&format!(
            "SELECT {PATTERN_COLUMNS} FROM movement_patterns WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get movement pattern by ID: {}", e)))?;

        Ok(result)
    }

    /// List all patterns
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<MovementPattern>> {
        let result = sqlx::query_as::<_, MovementPattern>(&format!(
            "SELECT {PATTERN_COLUMNS} FROM movement_patterns ORDER BY name OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list movement patterns: {}", e)))?;

        Ok(result)
    }

    /// Update pattern
    pub async fn update(&self, pattern: &MovementPattern) -> Result<MovementPattern> {
        let result = sqlx::query_as::<_, MovementPattern>(
            r#"
            UPDATE movement_patterns
            SET name = $1, description = $2, pattern_data = $3, updated_at = $4
            WHERE id = $5
            RETURNING id, name, description, pattern_data, created_at, updated_at
            "#,
        )
        .bind(&pattern.name)
        .bind(&pattern.description)
        .bind(&pattern.pattern_data)
        .bind(Utc::now())
        .bind(pattern.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update movement pattern: {}", e)))?;

        Ok(result)
    }

    /// Delete pattern
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM movement_patterns
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete movement pattern: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for pattern detections
#[derive(Clone)]
pub struct DetectedPatternsRepository {
    pool: Arc<PgPool>,
}

impl DetectedPatternsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Record a detection
    pub async fn create(&self, detection: &DetectedPattern) -> Result<DetectedPattern> {
        let result = sqlx::query_as::<_, DetectedPattern>(
            r#"
            INSERT INTO detected_patterns (id, pattern_id, event_id, timestamp, confidence)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, pattern_id, event_id, timestamp, confidence
            "#,
        )
        .bind(detection.id)
        .bind(detection.pattern_id)
        .bind(detection.event_id)
        .bind(detection.timestamp)
        .bind(detection.confidence)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create detected pattern: {}", e)))?;

        Ok(result)
    }

    /// List detections with optional filters
    pub async fn list(
        &self,
        event_id: Option<Uuid>,
        pattern_id: Option<Uuid>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<DetectedPattern>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {DETECTED_COLUMNS} FROM detected_patterns WHERE 1=1"
        ));

        if let Some(event_id) = event_id {
            query.push(" AND event_id = ").push_bind(event_id);
        }
        if let Some(pattern_id) = pattern_id {
            query.push(" AND pattern_id = ").push_bind(pattern_id);
        }

        query.push(" ORDER BY timestamp DESC");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<DetectedPattern>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list detected patterns: {}", e)))?;

        Ok(result)
    }
}
