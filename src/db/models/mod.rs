pub mod biometric_models;
pub mod event_models;
pub mod movement_models;
pub mod sound_models;
pub mod user_models;
pub mod visualization_models;
