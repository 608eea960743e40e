use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single physiological reading tied to a user at an event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BiometricData {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
    pub heart_rate: Option<f64>,
    /// Galvanic skin response
    pub gsr: Option<f64>,
    pub temperature: Option<f64>,
    pub energy_level: Option<f64>,
    pub emotional_state: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BiometricDataCreate {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub device_id: String,
    pub heart_rate: Option<f64>,
    pub gsr: Option<f64>,
    pub temperature: Option<f64>,
    pub energy_level: Option<f64>,
    pub emotional_state: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BiometricDataUpdate {
    pub heart_rate: Option<f64>,
    pub gsr: Option<f64>,
    pub temperature: Option<f64>,
    pub energy_level: Option<f64>,
    pub emotional_state: Option<String>,
}

impl BiometricDataUpdate {
    pub fn apply(&self, data: &mut BiometricData) {
        if let Some(heart_rate) = self.heart_rate {
            data.heart_rate = Some(heart_rate);
        }
        if let Some(gsr) = self.gsr {
            data.gsr = Some(gsr);
        }
        if let Some(temperature) = self.temperature {
            data.temperature = Some(temperature);
        }
        if let Some(energy_level) = self.energy_level {
            data.energy_level = Some(energy_level);
        }
        if let Some(emotional_state) = &self.emotional_state {
            data.emotional_state = Some(emotional_state.clone());
        }
    }
}

/// A wearable sensor registered with the platform
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BiometricDevice {
    pub id: Uuid,
    pub device_id: String,
    pub device_type: String,
    pub is_active: bool,
    pub last_connection: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BiometricDeviceCreate {
    pub device_id: String,
    pub device_type: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BiometricDeviceUpdate {
    pub device_type: Option<String>,
    pub is_active: Option<bool>,
}

impl BiometricDeviceUpdate {
    pub fn apply(&self, device: &mut BiometricDevice) {
        if let Some(device_type) = &self.device_type {
            device.device_type = device_type.clone();
        }
        if let Some(is_active) = self.is_active {
            device.is_active = is_active;
        }
    }
}

/// Simulate request: which user/event/device the synthetic reading belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct BiometricSimulateRequest {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub device_id: String,
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_update_merges_partially() {
        let mut data = BiometricData {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            device_id: "band-01".to_string(),
            timestamp: Utc::now(),
            heart_rate: Some(72.0),
            gsr: Some(1.5),
            temperature: None,
            energy_level: None,
            emotional_state: None,
        };
        let update = BiometricDataUpdate {
            temperature: Some(36.7),
            ..Default::default()
        };
        update.apply(&mut data);
        assert_eq!(data.heart_rate, Some(72.0));
        assert_eq!(data.temperature, Some(36.7));
        assert_eq!(data.gsr, Some(1.5));
    }

    #[test]
    fn device_create_defaults_to_active() {
        let payload: BiometricDeviceCreate =
            serde_json::from_str(r#"{"device_id": "band-01", "device_type": "wristband"}"#)
                .unwrap();
        assert!(payload.is_active);
    }
}
