use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Generated sound parameters for an event, optionally tied to a movement sample
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SoundEvent {
    pub id: Uuid,
    pub event_id: Uuid,
    pub movement_data_id: Option<Uuid>,
    pub timestamp: DateTime<Utc>,
    pub sound_type: String,
    pub parameters: Value,
    /// Duration in seconds
    pub duration: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundEventCreate {
    pub event_id: Uuid,
    pub movement_data_id: Option<Uuid>,
    pub sound_type: String,
    pub parameters: Value,
    pub duration: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SoundEventUpdate {
    pub sound_type: Option<String>,
    pub parameters: Option<Value>,
    pub duration: Option<f64>,
    pub intensity: Option<f64>,
}

impl SoundEventUpdate {
    pub fn apply(&self, sound_event: &mut SoundEvent) {
        if let Some(sound_type) = &self.sound_type {
            sound_event.sound_type = sound_type.clone();
        }
        if let Some(parameters) = &self.parameters {
            sound_event.parameters = parameters.clone();
        }
        if let Some(duration) = self.duration {
            sound_event.duration = duration;
        }
        if let Some(intensity) = self.intensity {
            sound_event.intensity = intensity;
        }
    }
}

/// A song requested by a user for an event, pending admin approval
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SongSelection {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub song_title: String,
    pub artist: String,
    pub duration: f64,
    pub audio_features: Option<Value>,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongSelectionCreate {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub song_title: String,
    pub artist: String,
    pub duration: f64,
    pub audio_features: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SongSelectionUpdate {
    pub song_title: Option<String>,
    pub artist: Option<String>,
    pub duration: Option<f64>,
    pub audio_features: Option<Value>,
    /// Admin-only field; checked before any merge is applied
    pub is_approved: Option<bool>,
}

impl SongSelectionUpdate {
    pub fn apply(&self, song: &mut SongSelection) {
        if let Some(song_title) = &self.song_title {
            song.song_title = song_title.clone();
        }
        if let Some(artist) = &self.artist {
            song.artist = artist.clone();
        }
        if let Some(duration) = self.duration {
            song.duration = duration;
        }
        if let Some(audio_features) = &self.audio_features {
            song.audio_features = Some(audio_features.clone());
        }
        if let Some(is_approved) = self.is_approved {
            song.is_approved = is_approved;
        }
    }
}

/// A named audio clip kept for playback
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SoundSample {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub sample_data: Vec<u8>,
    pub duration: f64,
    pub sample_rate: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundSampleCreate {
    pub name: String,
    pub category: String,
    pub sample_data: Vec<u8>,
    pub duration: f64,
    pub sample_rate: i32,
}

/// A reusable parameter template for the sound engine
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SoundPreset {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub parameters: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundPresetCreate {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SoundPresetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<Value>,
}

impl SoundPresetUpdate {
    pub fn apply(&self, preset: &mut SoundPreset) {
        if let Some(name) = &self.name {
            preset.name = name.clone();
        }
        if let Some(description) = &self.description {
            preset.description = Some(description.clone());
        }
        if let Some(parameters) = &self.parameters {
            preset.parameters = parameters.clone();
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SoundSimulateRequest {
    pub event_id: Uuid,
    pub movement_data_id: Option<Uuid>,
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn song_update_leaves_absent_fields() {
        let mut song = SongSelection {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            song_title: "Strobe".to_string(),
            artist: "deadmau5".to_string(),
            duration: 635.0,
            audio_features: None,
            is_approved: false,
            created_at: Utc::now(),
        };
        let update = SongSelectionUpdate {
            artist: Some("Deadmau5".to_string()),
            ..Default::default()
        };
        update.apply(&mut song);
        assert_eq!(song.song_title, "Strobe");
        assert_eq!(song.artist, "Deadmau5");
        assert!(!song.is_approved);
    }
}
