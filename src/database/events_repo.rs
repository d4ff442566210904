use sqlx::SqlitePool;

use super::search_key;
use crate::models::{EventScope, EventsRow};

const SQL_INSERT_EVENT: &str = r#"
INSERT INTO events (
  event_id,
  title,
  title_key,
  description,
  location,
  starts_at,
  ends_at
) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

pub struct NewEvent<'a> {
    pub event_id: &'a str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub starts_at: &'a str,
    pub ends_at: Option<&'a str>,
}

pub async fn insert_event(pool: &SqlitePool, event: NewEvent<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_EVENT)
        .bind(event.event_id)
        .bind(event.title)
        .bind(search_key(event.title))
        .bind(event.description)
        .bind(event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_UPDATE_EVENT: &str = r#"
UPDATE events
SET
  title = ?,
  title_key = ?,
  description = ?,
  location = ?,
  starts_at = ?,
  ends_at = ?,
  updated_at = strftime('%Y-%m-%dT%H:%M:%S', 'now')
WHERE event_id = ?
"#;

pub async fn update_event(pool: &SqlitePool, event: NewEvent<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_UPDATE_EVENT)
        .bind(event.title)
        .bind(search_key(event.title))
        .bind(event.description)
        .bind(event.location)
        .bind(event.starts_at)
        .bind(event.ends_at)
        .bind(event.event_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_EVENT_VOLUNTEERS: &str = r#"
DELETE FROM event_volunteers
WHERE event_id = ?
"#;

const SQL_DELETE_EVENT: &str = r#"
DELETE FROM events
WHERE event_id = ?
"#;

pub async fn delete_event(pool: &SqlitePool, event_id: &str) -> sqlx::Result<u64> {
    let mut tx = pool.begin().await?;
    sqlx::query(SQL_DELETE_EVENT_VOLUNTEERS)
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    let res = sqlx::query(SQL_DELETE_EVENT)
        .bind(event_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(res.rows_affected())
}

const SQL_EVENT_EXISTS: &str = r#"
SELECT EXISTS (SELECT 1 FROM events WHERE event_id = ?)
"#;

pub async fn event_exists(pool: &SqlitePool, event_id: &str) -> sqlx::Result<bool> {
    let (exists,): (i64,) = sqlx::query_as(SQL_EVENT_EXISTS)
        .bind(event_id)
        .fetch_one(pool)
        .await?;
    Ok(exists != 0)
}

const SQL_LOAD_EVENT_BY_ID: &str = r#"
SELECT
  e.event_id,
  e.title,
  e.description,
  e.location,
  e.starts_at,
  e.ends_at,
  (
    SELECT COUNT(*) FROM event_volunteers ev
    WHERE ev.event_id = e.event_id AND ev.list = 'registered'
  ) AS registered_count,
  (
    SELECT COUNT(*) FROM event_volunteers ev
    WHERE ev.event_id = e.event_id AND ev.list = 'attended'
  ) AS attended_count
FROM events e
WHERE e.event_id = ?
LIMIT 1
"#;

pub async fn load_event_by_id(pool: &SqlitePool, event_id: &str) -> sqlx::Result<Option<EventsRow>> {
    sqlx::query_as::<_, EventsRow>(SQL_LOAD_EVENT_BY_ID)
        .bind(event_id)
        .fetch_optional(pool)
        .await
}

const SQL_COUNT_UPCOMING: &str = r#"
SELECT COUNT(*)
FROM events e
WHERE datetime(e.starts_at) > datetime('now')
  AND (? = '' OR e.title_key LIKE ? ESCAPE '\')
"#;

const SQL_COUNT_HISTORY: &str = r#"
SELECT COUNT(*)
FROM events e
WHERE datetime(e.starts_at) <= datetime('now')
  AND (? = '' OR e.title_key LIKE ? ESCAPE '\')
"#;

/// `q_like` is either empty (no filter) or a complete LIKE pattern.
pub async fn count_events(pool: &SqlitePool, scope: EventScope, q_like: &str) -> sqlx::Result<i64> {
    let sql = match scope {
        EventScope::Upcoming => SQL_COUNT_UPCOMING,
        EventScope::Past => SQL_COUNT_HISTORY,
    };
    let (n,): (i64,) = sqlx::query_as(sql)
        .bind(q_like)
        .bind(q_like)
        .fetch_one(pool)
        .await?;
    Ok(n)
}

const SQL_LIST_UPCOMING: &str = r#"
SELECT
  e.event_id,
  e.title,
  e.description,
  e.location,
  e.starts_at,
  e.ends_at,
  (
    SELECT COUNT(*) FROM event_volunteers ev
    WHERE ev.event_id = e.event_id AND ev.list = 'registered'
  ) AS registered_count,
  (
    SELECT COUNT(*) FROM event_volunteers ev
    WHERE ev.event_id = e.event_id AND ev.list = 'attended'
  ) AS attended_count
FROM events e
WHERE datetime(e.starts_at) > datetime('now')
  AND (? = '' OR e.title_key LIKE ? ESCAPE '\')
ORDER BY datetime(e.starts_at) ASC, e.event_id ASC
LIMIT ? OFFSET ?
"#;

const SQL_LIST_HISTORY: &str = r#"
SELECT
  e.event_id,
  e.title,
  e.description,
  e.location,
  e.starts_at,
  e.ends_at,
  (
    SELECT COUNT(*) FROM event_volunteers ev
    WHERE ev.event_id = e.event_id AND ev.list = 'registered'
  ) AS registered_count,
  (
    SELECT COUNT(*) FROM event_volunteers ev
    WHERE ev.event_id = e.event_id AND ev.list = 'attended'
  ) AS attended_count
FROM events e
WHERE datetime(e.starts_at) <= datetime('now')
  AND (? = '' OR e.title_key LIKE ? ESCAPE '\')
ORDER BY datetime(e.starts_at) DESC, e.event_id ASC
LIMIT ? OFFSET ?
"#;

pub async fn list_events(
    pool: &SqlitePool,
    scope: EventScope,
    q_like: &str,
    limit: i64,
    offset: i64,
) -> sqlx::Result<Vec<EventsRow>> {
    let sql = match scope {
        EventScope::Upcoming => SQL_LIST_UPCOMING,
        EventScope::Past => SQL_LIST_HISTORY,
    };
    sqlx::query_as::<_, EventsRow>(sql)
        .bind(q_like)
        .bind(q_like)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}
