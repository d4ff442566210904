use sqlx::SqlitePool;

use super::search_key;
use crate::models::VolunteersRow;

const SQL_INSERT_VOLUNTEER: &str = r#"
INSERT INTO volunteers (
  volunteer_id,
  name,
  name_key,
  email,
  phone
) VALUES (?, ?, ?, ?, ?)
"#;

pub struct NewVolunteer<'a> {
    pub volunteer_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
}

pub async fn insert_volunteer(pool: &SqlitePool, volunteer: NewVolunteer<'_>) -> sqlx::Result<u64> {
    let res = sqlx::query(SQL_INSERT_VOLUNTEER)
        .bind(volunteer.volunteer_id)
        .bind(volunteer.name)
        .bind(search_key(volunteer.name))
        .bind(volunteer.email)
        .bind(volunteer.phone)
        .execute(pool)
        .await?;
    Ok(res.rows_affected())
}

const SQL_LOAD_VOLUNTEER_BY_ID: &str = r#"
SELECT
  volunteer_id,
  name,
  email,
  phone
FROM volunteers
WHERE volunteer_id = ?1
LIMIT 1
"#;

pub async fn load_volunteer_by_id(
    pool: &SqlitePool,
    volunteer_id: &str,
) -> sqlx::Result<Option<VolunteersRow>> {
    sqlx::query_as::<_, VolunteersRow>(SQL_LOAD_VOLUNTEER_BY_ID)
        .bind(volunteer_id)
        .fetch_optional(pool)
        .await
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct VolunteerHoursRow {
    pub events_attended: i64,
    pub total_hours: f64,
}

const SQL_LOAD_VOLUNTEER_HOURS: &str = r#"
SELECT
  COUNT(*) AS events_attended,
  CAST(COALESCE(SUM(hours), 0) AS REAL) AS total_hours
FROM event_volunteers
WHERE volunteer_id = ?1
  AND list = 'attended'
"#;

pub async fn load_volunteer_hours(
    pool: &SqlitePool,
    volunteer_id: &str,
) -> sqlx::Result<VolunteerHoursRow> {
    sqlx::query_as::<_, VolunteerHoursRow>(SQL_LOAD_VOLUNTEER_HOURS)
        .bind(volunteer_id)
        .fetch_one(pool)
        .await
}
