use std::ops::{Range, RangeInclusive};

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::events_repo;
use crate::error::AppError;
use crate::models::{EventScope, EventsRow};
use crate::services::pagination::{self, LikeMode, Paginated};

pub const EVENTS_PAGE_SIZE: i64 = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventView {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: String,
    pub ends_at: Option<String>,
    pub registered_count: i64,
    pub attended_count: i64,
}

impl From<EventsRow> for EventView {
    fn from(row: EventsRow) -> Self {
        Self {
            id: row.event_id,
            title: row.title,
            description: row.description,
            location: row.location,
            starts_at: row.starts_at,
            ends_at: row.ends_at,
            registered_count: row.registered_count,
            attended_count: row.attended_count,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub starts_at: String,
    pub ends_at: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct EventsQuery {
    pub scope: Option<String>,
    pub page: Option<i64>,
    pub search: Option<String>,
}

struct ValidEvent {
    title: String,
    description: Option<String>,
    location: Option<String>,
    starts_at: String,
    ends_at: Option<String>,
}

impl ValidEvent {
    fn as_new_event<'a>(&'a self, event_id: &'a str) -> events_repo::NewEvent<'a> {
        events_repo::NewEvent {
            event_id,
            title: &self.title,
            description: self.description.as_deref(),
            location: self.location.as_deref(),
            starts_at: &self.starts_at,
            ends_at: self.ends_at.as_deref(),
        }
    }
}

pub async fn create_event(pool: &SqlitePool, input: &EventInput) -> Result<EventView, AppError> {
    let event = validate(input)?;
    let id = Uuid::new_v4().to_string();
    events_repo::insert_event(pool, event.as_new_event(&id)).await?;
    info!(event_id = %id, title = %event.title, "event_created");
    load_event(pool, &id).await
}

pub async fn update_event(
    pool: &SqlitePool,
    event_id: &str,
    input: &EventInput,
) -> Result<EventView, AppError> {
    let event = validate(input)?;
    let updated = events_repo::update_event(pool, event.as_new_event(event_id)).await?;
    if updated == 0 {
        return Err(AppError::not_found("event", event_id));
    }
    info!(event_id, "event_updated");
    load_event(pool, event_id).await
}

pub async fn delete_event(pool: &SqlitePool, event_id: &str) -> Result<(), AppError> {
    let deleted = events_repo::delete_event(pool, event_id).await?;
    if deleted == 0 {
        return Err(AppError::not_found("event", event_id));
    }
    info!(event_id, "event_deleted");
    Ok(())
}

pub async fn load_event(pool: &SqlitePool, event_id: &str) -> Result<EventView, AppError> {
    events_repo::load_event_by_id(pool, event_id)
        .await?
        .map(EventView::from)
        .ok_or_else(|| AppError::not_found("event", event_id))
}

pub async fn list_events(
    pool: &SqlitePool,
    query: &EventsQuery,
) -> Result<Paginated<EventView>, AppError> {
    let scope = EventScope::parse(query.scope.as_deref())
        .ok_or_else(|| AppError::invalid("scope must be 'upcoming' or 'past'"))?;
    let page = query.page.unwrap_or(0);
    let offset = pagination::offset(page, EVENTS_PAGE_SIZE)?;
    let q_like = pagination::search_like(query.search.as_deref(), LikeMode::Contains);

    let total = events_repo::count_events(pool, scope, &q_like).await?;
    let rows = events_repo::list_events(pool, scope, &q_like, EVENTS_PAGE_SIZE, offset).await?;

    Ok(Paginated::new(
        rows.into_iter().map(EventView::from).collect(),
        page,
        EVENTS_PAGE_SIZE,
        total,
    ))
}

fn validate(input: &EventInput) -> Result<ValidEvent, AppError> {
    let title = input.title.trim();
    if title.is_empty() {
        return Err(AppError::invalid("title is required"));
    }
    let starts_at = normalize_timestamp(&input.starts_at)
        .ok_or_else(|| AppError::invalid("starts_at must look like YYYY-MM-DDTHH:MM"))?;
    let ends_at = match input.ends_at.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(
            normalize_timestamp(raw)
                .ok_or_else(|| AppError::invalid("ends_at must look like YYYY-MM-DDTHH:MM"))?,
        ),
    };
    // Normalized timestamps share one fixed-width format, so they compare as strings.
    if let Some(end) = &ends_at {
        if end < &starts_at {
            return Err(AppError::invalid("ends_at is before starts_at"));
        }
    }

    Ok(ValidEvent {
        title: title.to_string(),
        description: non_empty(input.description.as_deref()),
        location: non_empty(input.location.as_deref()),
        starts_at,
        ends_at,
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

/// Accepts `YYYY-MM-DDTHH:MM` with optional `:SS` (a space may replace the
/// `T`) and returns `YYYY-MM-DDTHH:MM:SS`.
fn normalize_timestamp(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if !raw.is_ascii() || !(raw.len() == 16 || raw.len() == 19) {
        return None;
    }
    let (y, m, d) = parse_ymd(raw.get(0..10)?)?;
    if !matches!(raw.get(10..11)?, "T" | " ") {
        return None;
    }
    let hh = parse_part(raw, 11..13, 0..=23)?;
    if raw.get(13..14)? != ":" {
        return None;
    }
    let mm = parse_part(raw, 14..16, 0..=59)?;
    let ss = if raw.len() == 19 {
        if raw.get(16..17)? != ":" {
            return None;
        }
        parse_part(raw, 17..19, 0..=59)?
    } else {
        0
    };
    Some(format!("{y:04}-{m:02}-{d:02}T{hh:02}:{mm:02}:{ss:02}"))
}

fn parse_ymd(date: &str) -> Option<(u32, u32, u32)> {
    if date.get(4..5)? != "-" || date.get(7..8)? != "-" {
        return None;
    }
    let y = parse_part(date, 0..4, 1..=9999)?;
    let m = parse_part(date, 5..7, 1..=12)?;
    let d = parse_part(date, 8..10, 1..=days_in_month(y, m))?;
    Some((y, m, d))
}

fn parse_part(s: &str, range: Range<usize>, valid: RangeInclusive<u32>) -> Option<u32> {
    let part = s.get(range)?;
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let v = part.parse::<u32>().ok()?;
    valid.contains(&v).then_some(v)
}

fn days_in_month(y: u32, m: u32) -> u32 {
    match m {
        2 if (y % 4 == 0 && y % 100 != 0) || y % 400 == 0 => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::fixtures;

    fn input(title: &str, starts_at: &str, ends_at: Option<&str>) -> EventInput {
        EventInput {
            title: title.to_string(),
            description: Some("  Bring gloves.  ".to_string()),
            location: Some(String::new()),
            starts_at: starts_at.to_string(),
            ends_at: ends_at.map(str::to_string),
        }
    }

    fn query(scope: Option<&str>, page: Option<i64>, search: Option<&str>) -> EventsQuery {
        EventsQuery {
            scope: scope.map(str::to_string),
            page,
            search: search.map(str::to_string),
        }
    }

    #[test]
    fn test_normalize_timestamp() {
        assert_eq!(
            normalize_timestamp("2025-03-09T14:30"),
            Some("2025-03-09T14:30:00".to_string())
        );
        assert_eq!(
            normalize_timestamp(" 2025-03-09 14:30:15 "),
            Some("2025-03-09T14:30:15".to_string())
        );
        assert_eq!(
            normalize_timestamp("2024-02-29T08:00"),
            Some("2024-02-29T08:00:00".to_string())
        );
        assert_eq!(normalize_timestamp("2023-02-29T08:00"), None);
        assert_eq!(normalize_timestamp("2025-13-01T08:00"), None);
        assert_eq!(normalize_timestamp("2025-01-01T24:00"), None);
        assert_eq!(normalize_timestamp("2025-01-01"), None);
        assert_eq!(normalize_timestamp("2025-01-01T8:00"), None);
        assert_eq!(normalize_timestamp("tomorrow"), None);
    }

    #[tokio::test]
    async fn test_create_and_load_event() {
        let pool = fixtures::pool().await;
        let created = create_event(&pool, &input(" Beach cleanup ", "2999-06-01T09:00", None))
            .await
            .expect("create");
        assert_eq!(created.title, "Beach cleanup");
        assert_eq!(created.description.as_deref(), Some("Bring gloves."));
        assert_eq!(created.location, None);
        assert_eq!(created.starts_at, "2999-06-01T09:00:00");
        assert_eq!(created.registered_count, 0);

        let loaded = load_event(&pool, &created.id).await.expect("load");
        assert_eq!(loaded.id, created.id);
    }

    #[tokio::test]
    async fn test_create_event_validation() {
        let pool = fixtures::pool().await;
        for bad in [
            input("", "2999-06-01T09:00", None),
            input("Cleanup", "soon", None),
            input("Cleanup", "2999-06-01T09:00", Some("2999-06-01T08:00")),
            input("Cleanup", "2999-06-01T09:00", Some("later")),
        ] {
            let err = create_event(&pool, &bad).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidArgument(_)), "{err}");
        }
    }

    #[tokio::test]
    async fn test_update_event() {
        let pool = fixtures::pool().await;
        fixtures::seed_event(&pool, "e1", "Old title", "2999-06-01T09:00:00").await;

        let updated = update_event(
            &pool,
            "e1",
            &input("New title", "2999-06-02T10:00", Some("2999-06-02T12:00")),
        )
        .await
        .expect("update");
        assert_eq!(updated.title, "New title");
        assert_eq!(updated.ends_at.as_deref(), Some("2999-06-02T12:00:00"));

        let err = update_event(&pool, "missing", &input("X", "2999-06-02T10:00", None))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_event_removes_volunteer_lists() {
        let pool = fixtures::pool().await;
        fixtures::seed_event(&pool, "e1", "Cleanup", "2999-06-01T09:00:00").await;
        fixtures::seed_registered(&pool, "e1", "v1", "Ann").await;
        fixtures::seed_attended(&pool, "e1", "v2", "Bob", 1.0).await;

        delete_event(&pool, "e1").await.expect("delete");
        assert!(matches!(
            load_event(&pool, "e1").await,
            Err(AppError::NotFound(_))
        ));
        let (left,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM event_volunteers")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(left, 0);

        assert!(matches!(
            delete_event(&pool, "e1").await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_event_counts() {
        let pool = fixtures::pool().await;
        fixtures::seed_event(&pool, "e1", "Cleanup", "2999-06-01T09:00:00").await;
        fixtures::seed_registered(&pool, "e1", "v1", "Ann").await;
        fixtures::seed_registered(&pool, "e1", "v2", "Bob").await;
        fixtures::seed_attended(&pool, "e1", "v3", "Cas", 1.0).await;

        let event = load_event(&pool, "e1").await.unwrap();
        assert_eq!(event.registered_count, 2);
        assert_eq!(event.attended_count, 1);
    }

    #[tokio::test]
    async fn test_list_upcoming_and_past() {
        let pool = fixtures::pool().await;
        fixtures::seed_event(&pool, "p1", "Old cleanup", "2001-01-01T09:00:00").await;
        fixtures::seed_event(&pool, "p2", "Older food bank", "2000-01-01T09:00:00").await;
        fixtures::seed_event(&pool, "u1", "Late cleanup", "2999-12-01T09:00:00").await;
        fixtures::seed_event(&pool, "u2", "Early food bank", "2998-01-01T09:00:00").await;

        let upcoming = list_events(&pool, &query(None, None, None)).await.unwrap();
        let ids: Vec<&str> = upcoming.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["u2", "u1"]);
        assert_eq!(upcoming.total, 2);
        assert_eq!(upcoming.total_pages, 1);

        let past = list_events(&pool, &query(Some("past"), Some(0), None))
            .await
            .unwrap();
        let ids: Vec<&str> = past.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2"]);

        let searched = list_events(&pool, &query(Some("past"), None, Some("FOOD")))
            .await
            .unwrap();
        assert_eq!(searched.total, 1);
        assert_eq!(searched.items[0].id, "p2");
    }

    #[tokio::test]
    async fn test_title_search_folds_non_ascii_case() {
        let pool = fixtures::pool().await;
        fixtures::seed_event(&pool, "u1", "Ökomarkt aufbauen", "2999-01-01T09:00:00").await;
        fixtures::seed_event(&pool, "u2", "Café de la Gare", "2999-02-01T09:00:00").await;
        fixtures::seed_event(&pool, "u3", "Okay day", "2999-03-01T09:00:00").await;

        let found = list_events(&pool, &query(None, None, Some("ökomarkt")))
            .await
            .unwrap();
        let ids: Vec<&str> = found.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["u1"]);

        let found = list_events(&pool, &query(None, None, Some("CAFÉ")))
            .await
            .unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.items[0].id, "u2");

        // A renamed event is found under its new title only.
        update_event(&pool, "u3", &input("Église cleanup", "2999-03-01T09:00", None))
            .await
            .unwrap();
        let found = list_events(&pool, &query(None, None, Some("ÉGLISE")))
            .await
            .unwrap();
        assert_eq!(found.total, 1);
        let found = list_events(&pool, &query(None, None, Some("okay")))
            .await
            .unwrap();
        assert_eq!(found.total, 0);
    }

    #[test]
    fn test_event_json_is_camel_case() {
        let view = EventView {
            id: "e1".to_string(),
            title: "Cleanup".to_string(),
            description: None,
            location: None,
            starts_at: "2999-06-01T09:00:00".to_string(),
            ends_at: None,
            registered_count: 2,
            attended_count: 1,
        };
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["startsAt"], "2999-06-01T09:00:00");
        assert_eq!(json["registeredCount"], 2);
        assert_eq!(json["attendedCount"], 1);
        assert!(json.get("registered_count").is_none());

        let input: EventInput =
            serde_json::from_value(serde_json::json!({"title": "X", "startsAt": "2999-06-01T09:00"}))
                .unwrap();
        assert_eq!(input.starts_at, "2999-06-01T09:00");
    }

    #[tokio::test]
    async fn test_list_events_pages() {
        let pool = fixtures::pool().await;
        for i in 0..12 {
            let id = format!("e{i:02}");
            let starts_at = format!("2999-01-{:02}T09:00:00", i + 1);
            fixtures::seed_event(&pool, &id, "Shift", &starts_at).await;
        }

        let second = list_events(&pool, &query(Some("upcoming"), Some(1), None))
            .await
            .unwrap();
        assert_eq!(second.total, 12);
        assert_eq!(second.total_pages, 2);
        let ids: Vec<&str> = second.items.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e10", "e11"]);
    }

    #[tokio::test]
    async fn test_list_events_rejects_bad_arguments() {
        let pool = fixtures::pool().await;
        assert!(matches!(
            list_events(&pool, &query(Some("someday"), None, None)).await,
            Err(AppError::InvalidArgument(_))
        ));
        assert!(matches!(
            list_events(&pool, &query(None, Some(-2), None)).await,
            Err(AppError::InvalidArgument(_))
        ));
    }
}
