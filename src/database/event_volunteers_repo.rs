use sqlx::SqlitePool;

use crate::models::{EventVolunteerRow, VolunteerList, VolunteersRow};

const SQL_COUNT_EVENT_VOLUNTEERS: &str = r#"
SELECT COUNT(*)
FROM event_volunteers ev
JOIN volunteers v
  ON v.volunteer_id = ev.volunteer_id
WHERE ev.event_id = ?
  AND ev.list = ?
  AND (? = '' OR v.name_key LIKE ? ESCAPE '\')
"#;

/// `name_like` is either empty (no filter) or a complete LIKE pattern.
pub async fn count_event_volunteers(
    pool: &SqlitePool,
    event_id: &str,
    list: VolunteerList,
    name_like: &str,
) -> sqlx::Result<i64> {
    let (n,): (i64,) = sqlx::query_as(SQL_COUNT_EVENT_VOLUNTEERS)
        .bind(event_id)
        .bind(list.as_str())
        .bind(name_like)
        .bind(name_like)
        .fetch_one(pool)
        .await?;
    Ok(n)
}

// Sorted by name; `seq` (insertion order) breaks ties.
const SQL_LIST_EVENT_VOLUNTEERS: &str = r#"
SELECT
  v.volunteer_id,
  v.name,
  v.email,
  v.phone
FROM event_volunteers ev
JOIN volunteers v
  ON v.volunteer_id = ev.volunteer_id
WHERE ev.event_id = ?
  AND ev.list = ?
  AND (? = '' OR v.name_key LIKE ? ESCAPE '\')
ORDER BY v.name ASC, ev.seq ASC
LIMIT ? OFFSET ?
"#;

pub async fn list_event_volunteers(
    pool: &SqlitePool,
    event_id: &str,
    list: VolunteerList,
    name_like: &str,
    offset: i64,
    limit: i64,
) -> sqlx::Result<Vec<VolunteersRow>> {
    sqlx::query_as::<_, VolunteersRow>(SQL_LIST_EVENT_VOLUNTEERS)
        .bind(event_id)
        .bind(list.as_str())
        .bind(name_like)
        .bind(name_like)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
}

const SQL_LOAD_EVENT_VOLUNTEER: &str = r#"
SELECT list
FROM event_volunteers
WHERE event_id = ?
  AND volunteer_id = ?
LIMIT 1
"#;

pub async fn load_event_volunteer(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
) -> sqlx::Result<Option<EventVolunteerRow>> {
    sqlx::query_as::<_, EventVolunteerRow>(SQL_LOAD_EVENT_VOLUNTEER)
        .bind(event_id)
        .bind(volunteer_id)
        .fetch_optional(pool)
        .await
}

const SQL_INSERT_REGISTRATION: &str = r#"
INSERT INTO event_volunteers (
  event_id,
  volunteer_id,
  list
) VALUES (?, ?, 'registered')
"#;

pub async fn insert_registration(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_REGISTRATION)
        .bind(event_id)
        .bind(volunteer_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_DELETE_REGISTRATION: &str = r#"
DELETE FROM event_volunteers
WHERE event_id = ?
  AND volunteer_id = ?
  AND list = 'registered'
"#;

pub async fn delete_registration(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_DELETE_REGISTRATION)
        .bind(event_id)
        .bind(volunteer_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

// Only rows still in the registered list move; the row keeps its `seq`.
const SQL_MARK_ATTENDED: &str = r#"
UPDATE event_volunteers
SET
  list = 'attended',
  hours = ?,
  attended_at = strftime('%Y-%m-%dT%H:%M:%S', 'now')
WHERE event_id = ?
  AND volunteer_id = ?
  AND list = 'registered'
"#;

pub async fn mark_attended(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
    hours: f64,
) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_MARK_ATTENDED)
        .bind(hours)
        .bind(event_id)
        .bind(volunteer_id)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}
