pub mod biometrics;
pub mod events;
pub mod movement;
pub mod registrations;
pub mod sound;
pub mod users;
pub mod visualization;
