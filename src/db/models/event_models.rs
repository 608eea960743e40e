use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Event {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_active: bool,
    pub max_capacity: Option<i32>,
    /// Event-specific configuration (sound/visual intensities etc.)
    pub configuration: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventCreate {
    pub name: String,
    pub description: Option<String>,
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub is_active: bool,
    pub max_capacity: Option<i32>,
    pub configuration: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub max_capacity: Option<i32>,
    pub configuration: Option<Value>,
}

impl EventUpdate {
    pub fn apply(&self, event: &mut Event) {
        if let Some(name) = &self.name {
            event.name = name.clone();
        }
        if let Some(description) = &self.description {
            event.description = Some(description.clone());
        }
        if let Some(location) = &self.location {
            event.location = location.clone();
        }
        if let Some(start_time) = self.start_time {
            event.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            event.end_time = end_time;
        }
        if let Some(is_active) = self.is_active {
            event.is_active = is_active;
        }
        if let Some(max_capacity) = self.max_capacity {
            event.max_capacity = Some(max_capacity);
        }
        if let Some(configuration) = &self.configuration {
            event.configuration = Some(configuration.clone());
        }
    }
}

/// Registration of a user for an event
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserEvent {
    pub id: Uuid,
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub registration_time: DateTime<Utc>,
    pub checkin_time: Option<DateTime<Utc>>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserEventCreate {
    pub user_id: Uuid,
    pub event_id: Uuid,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEventUpdate {
    pub checkin_time: Option<DateTime<Utc>>,
    pub checkout_time: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
}

impl UserEventUpdate {
    pub fn apply(&self, registration: &mut UserEvent) {
        if let Some(checkin_time) = self.checkin_time {
            registration.checkin_time = Some(checkin_time);
        }
        if let Some(checkout_time) = self.checkout_time {
            registration.checkout_time = Some(checkout_time);
        }
        if let Some(is_active) = self.is_active {
            registration.is_active = is_active;
        }
    }
}

/// Check-in / check-out request; user_id defaults to the caller
#[derive(Debug, Clone, Deserialize)]
pub struct CheckinRequest {
    pub event_id: Uuid,
    pub user_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_update_keeps_absent_fields() {
        let mut registration = UserEvent {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            registration_time: Utc::now(),
            checkin_time: Some(Utc::now()),
            checkout_time: None,
            is_active: true,
        };
        let update = UserEventUpdate {
            checkout_time: Some(Utc::now()),
            ..Default::default()
        };
        update.apply(&mut registration);
        assert!(registration.checkin_time.is_some());
        assert!(registration.checkout_time.is_some());
        assert!(registration.is_active);
    }
}
