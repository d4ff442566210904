pub mod event_volunteers;
pub mod events;
pub mod volunteers;

pub use event_volunteers::{EventVolunteerRow, VolunteerList};
pub use events::{EventScope, EventsRow};
pub use volunteers::VolunteersRow;
