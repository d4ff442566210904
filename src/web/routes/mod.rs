pub mod event_volunteers;
pub mod events;
pub mod health;
pub mod volunteers;
