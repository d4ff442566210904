pub mod event_volunteers_service;
pub mod events_service;
pub mod pagination;
pub mod registration_service;
pub mod volunteers_service;
