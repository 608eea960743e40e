use crate::{
    db::models::biometric_models::{BiometricData, BiometricDevice},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

const DATA_COLUMNS: &str = "id, user_id, event_id, device_id, timestamp, heart_rate, gsr, \
                            temperature, energy_level, emotional_state";

const DEVICE_COLUMNS: &str =
    "id, device_id, device_type, is_active, last_connection, created_at, updated_at";

/// Repository for biometric readings
#[derive(Clone)]
pub struct BiometricDataRepository {
    pool: Arc<PgPool>,
}

impl BiometricDataRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new biometric reading
    pub async fn create(&self, data: &BiometricData) -> Result<BiometricData> {
        let result = sqlx::query_as::<_, BiometricData>(
            r#"
            INSERT INTO biometric_data (
                id, user_id, event_id, device_id, timestamp, heart_rate, gsr,
                temperature, energy_level, emotional_state
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, event_id, device_id, timestamp, heart_rate, gsr,
                      temperature, energy_level, emotional_state
            "#,
        )
        .bind(data.id)
        .bind(data.user_id)
        .bind(data.event_id)
        .bind(&data.device_id)
        .bind(data.timestamp)
        .bind(data.heart_rate)
        .bind(data.gsr)
        .bind(data.temperature)
        .bind(data.energy_level)
        .bind(&data.emotional_state)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create biometric data: {}", e)))?;

        Ok(result)
    }

    /// Get biometric reading by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<BiometricData>> {
        let result = sqlx::query_as::<_, BiometricData>(&format!(
            "SELECT {DATA_COLUMNS} FROM biometric_data WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get biometric data by ID: {}", e)))?;

        Ok(result)
    }

    /// List biometric readings with optional filters
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
        device_id: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<BiometricData>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {DATA_COLUMNS} FROM biometric_data WHERE 1=1"
        ));

        if let Some(user_id) = user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(event_id) = event_id {
            query.push(" AND event_id = ").push_bind(event_id);
        }
        if let Some(device_id) = device_id {
            query
                .push(" AND device_id = ")
                .push_bind(device_id.to_string());
        }

        query.push(" ORDER BY timestamp DESC");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<BiometricData>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list biometric data: {}", e)))?;

        Ok(result)
    }

    /// Update biometric reading
    pub async fn update(&self, data: &BiometricData) -> Result<BiometricData> {
        let result = sqlx::query_as::<_, BiometricData>(
            r#"
            UPDATE biometric_data
            SET heart_rate = $1, gsr = $2, temperature = $3, energy_level = $4, emotional_state = $5
            WHERE id = $6
            RETURNING id, user_id, event_id, device_id, timestamp, heart_rate, gsr,
                      temperature, energy_level, emotional_state
            "#,
        )
        .bind(data.heart_rate)
        .bind(data.gsr)
        .bind(data.temperature)
        .bind(data.energy_level)
        .bind(&data.emotional_state)
        .bind(data.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update biometric data: {}", e)))?;

        Ok(result)
    }

    /// Delete biometric reading
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM biometric_data
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete biometric data: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for registered biometric devices
#[derive(Clone)]
pub struct BiometricDevicesRepository {
    pool: Arc<PgPool>,
}

impl BiometricDevicesRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Register a new device
    pub async fn create(&self, device: &BiometricDevice) -> Result<BiometricDevice> {
        let result = sqlx::query_as::<_, BiometricDevice>(
            r#"
            INSERT INTO biometric_devices (
                id, device_id, device_type, is_active, last_connection, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, device_id, device_type, is_active, last_connection, created_at, updated_at
            "#,
        )
        .bind(device.id)
        .bind(&device.device_id)
        .bind(&device.device_type)
        .bind(device.is_active)
        .bind(device.last_connection)
        .bind(device.created_at)
        .bind(device.updated_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
                Error::AlreadyExists("Device ID already registered".to_string())
            }
            _ => Error::Database(format!("Failed to create biometric device: {}", e)),
        })?;

        Ok(result)
    }

    /// Get device by its external device_id string
    pub async fn get_by_device_id(&self, device_id: &str) -> Result<Option<BiometricDevice>> {
        let result = sqlx::query_as::<_, BiometricDevice>(&format!(
            "SELECT {DEVICE_COLUMNS} FROM biometric_devices WHERE device_id = $1"
        ))
        .bind(device_id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get biometric device: {}", e)))?;

        Ok(result)
    }

    /// List devices, optionally filtered by active status
    pub async fn list(
        &self,
        is_active: Option<bool>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<BiometricDevice>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {DEVICE_COLUMNS} FROM biometric_devices WHERE 1=1"
        ));

        if let Some(is_active) = is_active {
            query.push(" AND is_active = ").push_bind(is_active);
        }

        query.push(" ORDER BY device_id");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<BiometricDevice>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list biometric devices: {}", e)))?;

        Ok(result)
    }

    /// Update device, bumping last_connection
    pub async fn update(&self, device: &BiometricDevice) -> Result<BiometricDevice> {
        let result = sqlx::query_as::<_, BiometricDevice>(
            r#"
            UPDATE biometric_devices
            SET device_type = $1, is_active = $2, last_connection = $3, updated_at = $4
            WHERE id = $5
            RETURNING id, device_id, device_type, is_active, last_connection, created_at, updated_at
            "#,
        )
        .bind(&device.device_type)
        .bind(device.is_active)
        .bind(device.last_connection)
        .bind(Utc::now())
        .bind(device.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update biometric device: {}", e)))?;

        Ok(result)
    }

    /// Delete device
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM biometric_devices
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete biometric device: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
