use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Crowd movement captured for an event (heatmap, trajectory, gesture, ...)
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovementData {
    pub id: Uuid,
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub data_type: String,
    pub coordinates: Value,
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
    pub crowd_density: Option<f64>,
    pub movement_intensity: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovementDataCreate {
    pub event_id: Uuid,
    pub data_type: String,
    pub coordinates: Value,
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
    pub crowd_density: Option<f64>,
    pub movement_intensity: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementDataUpdate {
    pub data_type: Option<String>,
    pub coordinates: Option<Value>,
    pub velocity: Option<f64>,
    pub acceleration: Option<f64>,
    pub crowd_density: Option<f64>,
    pub movement_intensity: Option<f64>,
}

impl MovementDataUpdate {
    pub fn apply(&self, data: &mut MovementData) {
        if let Some(data_type) = &self.data_type {
            data.data_type = data_type.clone();
        }
        if let Some(coordinates) = &self.coordinates {
            data.coordinates = coordinates.clone();
        }
        if let Some(velocity) = self.velocity {
            data.velocity = Some(velocity);
        }
        if let Some(acceleration) = self.acceleration {
            data.acceleration = Some(acceleration);
        }
        if let Some(crowd_density) = self.crowd_density {
            data.crowd_density = Some(crowd_density);
        }
        if let Some(movement_intensity) = self.movement_intensity {
            data.movement_intensity = Some(movement_intensity);
        }
    }
}

/// A named pattern template used for detection
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovementPattern {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub pattern_data: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MovementPatternCreate {
    pub name: String,
    pub description: Option<String>,
    pub pattern_data: Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovementPatternUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pattern_data: Option<Value>,
}

impl MovementPatternUpdate {
    pub fn apply(&self, pattern: &mut MovementPattern) {
        if let Some(name) = &self.name {
            pattern.name = name.clone();
        }
        if let Some(description) = &self.description {
            pattern.description = Some(description.clone());
        }
        if let Some(pattern_data) = &self.pattern_data {
            pattern.pattern_data = pattern_data.clone();
        }
    }
}

/// A recognition of a pattern during an event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DetectedPattern {
    pub id: Uuid,
    pub pattern_id: Uuid,
    pub event_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub confidence: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectedPatternCreate {
    pub pattern_id: Uuid,
    pub event_id: Uuid,
    pub confidence: f64,
}

/// Largest crowd a single simulate request may ask for
pub const MAX_SIMULATED_DANCERS: u32 = 1000;

#[derive(Debug, Clone, Deserialize)]
pub struct MovementSimulateRequest {
    pub event_id: Uuid,
    #[serde(default = "default_num_dancers")]
    pub num_dancers: u32,
    pub seed: Option<u64>,
}

impl MovementSimulateRequest {
    /// Reject crowd sizes that would blow up the coordinates payload
    pub fn validate(&self) -> Result<(), crate::error::Error> {
        if self.num_dancers > MAX_SIMULATED_DANCERS {
            return Err(crate::error::Error::Validation(format!(
                "num_dancers must be at most {}",
                MAX_SIMULATED_DANCERS
            )));
        }
        Ok(())
    }
}

fn default_num_dancers() -> u32 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulate_request_defaults_dancers() {
        let request: MovementSimulateRequest =
            serde_json::from_value(serde_json::json!({ "event_id": Uuid::new_v4() })).unwrap();
        assert_eq!(request.num_dancers, 10);
        assert!(request.seed.is_none());
    }

    #[test]
    fn oversized_crowd_is_rejected() {
        let request = MovementSimulateRequest {
            event_id: Uuid::new_v4(),
            num_dancers: MAX_SIMULATED_DANCERS + 1,
            seed: None,
        };
        assert!(matches!(
            request.validate(),
            Err(crate::error::Error::Validation(_))
        ));

        let request = MovementSimulateRequest {
            event_id: Uuid::new_v4(),
            num_dancers: MAX_SIMULATED_DANCERS,
            seed: None,
        };
        assert!(request.validate().is_ok());
    }
}
