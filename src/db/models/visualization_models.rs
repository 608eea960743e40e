use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Generated visual-output parameters for an event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VisualizationEvent {
    pub id: Uuid,
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub visualization_type: String,
    pub parameters: Value,
    /// Duration in seconds
    pub duration: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualizationEventCreate {
    pub event_id: Uuid,
    pub visualization_type: String,
    pub parameters: Value,
    pub duration: f64,
    pub intensity: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisualizationEventUpdate {
    pub visualization_type: Option<String>,
    pub parameters: Option<Value>,
    pub duration: Option<f64>,
    pub intensity: Option<f64>,
}

impl VisualizationEventUpdate {
    pub fn apply(&self, visualization_event: &mut VisualizationEvent) {
        if let Some(visualization_type) = &self.visualization_type {
            visualization_event.visualization_type = visualization_type.clone();
        }
        if let Some(parameters) = &self.parameters {
            visualization_event.parameters = parameters.clone();
        }
        if let Some(duration) = self.duration {
            visualization_event.duration = duration;
        }
        if let Some(intensity) = self.intensity {
            visualization_event.intensity = intensity;
        }
    }
}

/// A reusable parameter template for visual output
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct VisualizationPreset {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub parameters: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VisualizationPresetCreate {
    pub name: String,
    pub description: Option<String>,
    pub parameters: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VisualizationPresetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub parameters: Option<Value>,
}

impl VisualizationPresetUpdate {
    pub fn apply(&self, preset: &mut VisualizationPreset) {
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
pub struct VisualizationSimulateRequest {
    pub event_id: Uuid,
    pub seed: Option<u64>,
}
