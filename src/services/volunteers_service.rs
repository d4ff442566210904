use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::info;
use uuid::Uuid;

use crate::database::volunteers_repo;
use crate::error::AppError;
use crate::models::VolunteersRow;

/// Public shape of a volunteer: identity plus display fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolunteerView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl From<VolunteersRow> for VolunteerView {
    fn from(row: VolunteersRow) -> Self {
        Self {
            id: row.volunteer_id,
            name: row.name,
            email: row.email,
            phone: row.phone,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfileView {
    #[serde(flatten)]
    pub volunteer: VolunteerView,
    pub events_attended: i64,
    pub total_hours: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VolunteerInput {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

pub async fn create_volunteer(
    pool: &SqlitePool,
    input: &VolunteerInput,
) -> Result<VolunteerView, AppError> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(AppError::invalid("name is required"));
    }
    let email = normalize_email(&input.email)
        .ok_or_else(|| AppError::invalid("email is not valid"))?;
    let phone = input
        .phone
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let id = Uuid::new_v4().to_string();
    let inserted = volunteers_repo::insert_volunteer(
        pool,
        volunteers_repo::NewVolunteer {
            volunteer_id: &id,
            name,
            email: &email,
            phone,
        },
    )
    .await;

    match inserted {
        Ok(_) => {}
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::conflict("email is already registered"));
        }
        Err(e) => return Err(e.into()),
    }

    info!(volunteer_id = %id, "volunteer_created");
    Ok(VolunteerView {
        id,
        name: name.to_string(),
        email,
        phone: phone.map(str::to_string),
    })
}

pub async fn load_volunteer_profile(
    pool: &SqlitePool,
    volunteer_id: &str,
) -> Result<VolunteerProfileView, AppError> {
    let Some(row) = volunteers_repo::load_volunteer_by_id(pool, volunteer_id).await? else {
        return Err(AppError::not_found("volunteer", volunteer_id));
    };
    let hours = volunteers_repo::load_volunteer_hours(pool, volunteer_id).await?;

    Ok(VolunteerProfileView {
        volunteer: row.into(),
        events_attended: hours.events_attended,
        total_hours: hours.total_hours,
    })
}

fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    if email.chars().any(char::is_whitespace) {
        return None;
    }
    Some(email)
}
