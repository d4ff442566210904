/// The two sub-collections an event keeps for its volunteers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolunteerList {
    /// Signed up, not yet marked present.
    Registered,
    /// Marked present.
    Attended,
}

impl VolunteerList {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolunteerList::Registered => "registered",
            VolunteerList::Attended => "attended",
        }
    }

    pub fn from_db(raw: &str) -> Option<Self> {
        match raw {
            "registered" => Some(VolunteerList::Registered),
            "attended" => Some(VolunteerList::Attended),
            _ => None,
        }
    }
}

/// Where one volunteer currently sits for one event.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventVolunteerRow {
    pub list: String,
}
