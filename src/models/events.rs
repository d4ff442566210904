#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventsRow {
    pub event_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub registered_count: i64,
    pub attended_count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventScope {
    Upcoming,
    Past,
}

impl EventScope {
    pub fn parse(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim).unwrap_or("") {
            "" | "upcoming" => Some(EventScope::Upcoming),
            "past" => Some(EventScope::Past),
            _ => None,
        }
    }
}
