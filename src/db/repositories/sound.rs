use crate::{
    db::models::sound_models::{SongSelection, SoundEvent, SoundPreset, SoundSample},
    error::Error,
};
use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, QueryBuilder};
use std::sync::Arc;
use uuid::Uuid;

const EVENT_COLUMNS: &str =
    "id, event_id, movement_data_id, timestamp, sound_type, parameters, duration, intensity";

const SONG_COLUMNS: &str = "id, user_id, event_id, song_title, artist, duration, \
                            audio_features, is_approved, created_at";

const SAMPLE_COLUMNS: &str = "id, name, category, sample_data, duration, sample_rate, created_at";

const PRESET_COLUMNS: &str = "id, name, description, parameters, created_at, updated_at";

/// Repository for generated sound events
#[derive(Clone)]
pub struct SoundEventsRepository {
    pool: Arc<PgPool>,
}

impl SoundEventsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new sound event
    pub async fn create(&self, sound_event: &SoundEvent) -> Result<SoundEvent> {
        let result = sqlx::query_as::<_, SoundEvent>(
            r#"
            INSERT INTO sound_events (
                id, event_id, movement_data_id, timestamp, sound_type, parameters, duration, intensity
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, event_id, movement_data_id, timestamp, sound_type, parameters, duration, intensity
            "#,
        )
        .bind(sound_event.id)
        .bind(sound_event.event_id)
        .bind(sound_event.movement_data_id)
        .bind(sound_event.timestamp)
        .bind(&sound_event.sound_type)
        .bind(&sound_event.parameters)
        .bind(sound_event.duration)
        .bind(sound_event.intensity)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create sound event: {}", e)))?;

        Ok(result)
    }

    /// Get sound event by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<SoundEvent>> {
        let result = sqlx::query_as::<_, SoundEvent>(&format!(
            "SELECT {EVENT_COLUMNS} FROM sound_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get sound event by ID: {}", e)))?;

        Ok(result)
    }

    /// List sound events with optional filters
    pub async fn list(
        &self,
        event_id: Option<Uuid>,
        sound_type: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<SoundEvent>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {EVENT_COLUMNS} FROM sound_events WHERE 1=1"
        ));

        if let Some(event_id) = event_id {
            query.push(" AND event_id = ").push_bind(event_id);
        }
        if let Some(sound_type) = sound_type {
            query
                .push(" AND sound_type = ")
                .push_bind(sound_type.to_string());
        }

        query.push(" ORDER BY timestamp DESC");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<SoundEvent>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list sound events: {}", e)))?;

        Ok(result)
    }

    /// Update sound event
    pub async fn update(&self, sound_event: &SoundEvent) -> Result<SoundEvent> {
        let result = sqlx::query_as::<_, SoundEvent>(
            r#"
            UPDATE sound_events
            SET sound_type = $1, parameters = $2, duration = $3, intensity = $4
            WHERE id = $5
            RETURNING id, event_id, movement_data_id, timestamp, sound_type, parameters, duration, intensity
            "#,
        )
        .bind(&sound_event.sound_type)
        .bind(&sound_event.parameters)
        .bind(sound_event.duration)
        .bind(sound_event.intensity)
        .bind(sound_event.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update sound event: {}", e)))?;

        Ok(result)
    }

    /// Delete sound event
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM sound_events
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete sound event: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for user song selections
#[derive(Clone)]
pub struct SongSelectionsRepository {
    pool: Arc<PgPool>,
}

impl SongSelectionsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new song selection
    pub async fn create(&self, song: &SongSelection) -> Result<SongSelection> {
        let result = sqlx::query_as::<_, SongSelection>(
            r#"
            INSERT INTO song_selections (
                id, user_id, event_id, song_title, artist, duration, audio_features, is_approved, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, user_id, event_id, song_title, artist, duration,
                      audio_features, is_approved, created_at
            "#,
        )
        .bind(song.id)
        .bind(song.user_id)
        .bind(song.event_id)
        .bind(&song.song_title)
        .bind(&song.artist)
        .bind(song.duration)
        .bind(&song.audio_features)
        .bind(song.is_approved)
        .bind(song.created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create song selection: {}", e)))?;

        Ok(result)
    }

    /// Get song selection by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<SongSelection>> {
        let result = sqlx::query_as::<_, SongSelection>(&format!(
            "SELECT {SONG_COLUMNS} FROM song_selections WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get song selection by ID: {}", e)))?;

        Ok(result)
    }

    /// List song selections with optional filters
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        event_id: Option<Uuid>,
        is_approved: Option<bool>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<SongSelection>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {SONG_COLUMNS} FROM song_selections WHERE 1=1"
        ));

        if let Some(user_id) = user_id {
            query.push(" AND user_id = ").push_bind(user_id);
        }
        if let Some(event_id) = event_id {
            query.push(" AND event_id = ").push_bind(event_id);
        }
        if let Some(is_approved) = is_approved {
            query.push(" AND is_approved = ").push_bind(is_approved);
        }

        query.push(" ORDER BY created_at DESC");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<SongSelection>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list song selections: {}", e)))?;

        Ok(result)
    }

    /// Update song selection
    pub async fn update(&self, song: &SongSelection) -> Result<SongSelection> {
        let result = sqlx::query_as::<_, SongSelection>(
            r#"
            UPDATE song_selections
            SET song_title = $1, artist = $2, duration = $3, audio_features = $4, is_approved = $5
            WHERE id = $6
            RETURNING id, user_id, event_id, song_title, artist, duration,
                      audio_features, is_approved, created_at
            "#,
        )
        .bind(&song.song_title)
        .bind(&song.artist)
        .bind(song.duration)
        .bind(&song.audio_features)
        .bind(song.is_approved)
        .bind(song.id)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to update song selection: {}", e)))?;

        Ok(result)
    }

    /// Delete song selection
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM song_selections
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete song selection: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for stored audio samples
#[derive(Clone)]
pub struct SoundSamplesRepository {
    pool: Arc<PgPool>,
}

impl SoundSamplesRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Store a new sample
    pub async fn create(&self, sample: &SoundSample) -> Result<SoundSample> {
        let result = sqlx::query_as::<_, SoundSample>(
            r#"
            INSERT INTO sound_samples (id, name, category, sample_data, duration, sample_rate, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, category, sample_data, duration, sample_rate, created_at
            "#,
        )
        .bind(sample.id)
        .bind(&sample.name)
        .bind(&sample.category)
        .bind(&sample.sample_data)
        .bind(sample.duration)
        .bind(sample.sample_rate)
        .bind(sample.created_at)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to create sound sample: {}", e)))?;

        Ok(result)
    }

    /// Get sample by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<SoundSample>> {
        let result = sqlx::query_as::<_, SoundSample>(&format!(
            "SELECT {SAMPLE_COLUMNS} FROM sound_samples WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get sound sample by ID: {}", e)))?;

        Ok(result)
    }

    /// List samples, optionally filtered by category
    pub async fn list(
        &self,
        category: Option<&str>,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<SoundSample>> {
        let mut query = QueryBuilder::new(format!(
            "SELECT {SAMPLE_COLUMNS} FROM sound_samples WHERE 1=1"
        ));

        if let Some(category) = category {
            query
                .push(" AND category = ")
                .push_bind(category.to_string());
        }

        query.push(" ORDER BY name");
        query.push(" OFFSET ").push_bind(skip);
        query.push(" LIMIT ").push_bind(limit);

        let result = query
            .build_query_as::<SoundSample>()
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| Error::Database(format!("Failed to list sound samples: {}", e)))?;

        Ok(result)
    }

    /// Delete sample
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM sound_samples
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete sound sample: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Repository for sound presets
#[derive(Clone)]
pub struct SoundPresetsRepository {
    pool: Arc<PgPool>,
}

impl SoundPresetsRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Create a new preset
    pub async fn create(&self, preset: &SoundPreset) -> Result<SoundPreset> {
        let result = sqlx::query_as::<_, SoundPreset>(
            r#"
            INSERT INTO sound_presets (id, name, description, parameters, created_at, updated_at)
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
        .map_err(|e| Error::Database(format!("Failed to create sound preset: {}", e)))?;

        Ok(result)
    }

    /// Get preset by ID
    pub async fn get_by_id(&self, id: &Uuid) -> Result<Option<SoundPreset>> {
        let result = sqlx::query_as::<_, SoundPreset>(&format!(
            "SELECT {PRESET_COLUMNS} FROM sound_presets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to get sound preset by ID: {}", e)))?;

        Ok(result)
    }

    /// List all presets
    pub async fn list(&self, skip: i64, limit: i64) -> Result<Vec<SoundPreset>> {
        let result = sqlx::query_as::<_, SoundPreset>(&format!(
            "SELECT {PRESET_COLUMNS} FROM sound_presets ORDER BY name OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to list sound presets: {}", e)))?;

        Ok(result)
    }

    /// Update preset
    pub async fn update(&self, preset: &SoundPreset) -> Result<SoundPreset> {
        let result = sqlx::query_as::<_, SoundPreset>(
            r#"
            UPDATE sound_presets
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
        .map_err(|e| Error::Database(format!("Failed to update sound preset: {}", e)))?;

        Ok(result)
    }

    /// Delete preset
    pub async fn delete(&self, id: &Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM sound_presets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await
        .map_err(|e| Error::Database(format!("Failed to delete sound preset: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }
}
