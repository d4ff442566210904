use sqlx::SqlitePool;
use tracing::info;

use crate::database::{event_volunteers_repo, events_repo, volunteers_repo};
use crate::error::AppError;
use crate::models::VolunteerList;

pub const MAX_SHIFT_HOURS: f64 = 24.0;

/// Adds the volunteer to the event's registered list.
pub async fn register_volunteer(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
) -> Result<(), AppError> {
    ensure_event(pool, event_id).await?;
    if volunteers_repo::load_volunteer_by_id(pool, volunteer_id)
        .await?
        .is_none()
    {
        return Err(AppError::not_found("volunteer", volunteer_id));
    }

    match current_list(pool, event_id, volunteer_id).await? {
        Some(VolunteerList::Registered) => {
            return Err(AppError::conflict("volunteer is already registered"));
        }
        Some(VolunteerList::Attended) => {
            return Err(AppError::conflict("volunteer already attended this event"));
        }
        None => {}
    }

    match event_volunteers_repo::insert_registration(pool, event_id, volunteer_id).await {
        Ok(_) => {}
        // Lost a race with a concurrent sign-up for the same pair.
        Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            return Err(AppError::conflict("volunteer is already registered"));
        }
        Err(e) => return Err(e.into()),
    }

    info!(event_id, volunteer_id, "volunteer_registered");
    Ok(())
}

/// Removes a registration. Attendance records are permanent.
pub async fn unregister_volunteer(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
) -> Result<(), AppError> {
    ensure_event(pool, event_id).await?;
    match current_list(pool, event_id, volunteer_id).await? {
        None => return Err(AppError::not_found("registration", volunteer_id)),
        Some(VolunteerList::Attended) => {
            return Err(AppError::conflict("attended volunteers cannot unregister"));
        }
        Some(VolunteerList::Registered) => {}
    }

    let removed = event_volunteers_repo::delete_registration(pool, event_id, volunteer_id).await?;
    if removed == 0 {
        return Err(AppError::conflict("registration changed concurrently"));
    }

    info!(event_id, volunteer_id, "volunteer_unregistered");
    Ok(())
}

/// Moves a registered volunteer to the attended list and records the hours
/// worked.
pub async fn mark_attended(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
    hours: f64,
) -> Result<(), AppError> {
    if !hours.is_finite() || !(0.0..=MAX_SHIFT_HOURS).contains(&hours) {
        return Err(AppError::invalid(format!(
            "hours must be between 0 and {MAX_SHIFT_HOURS}"
        )));
    }
    ensure_event(pool, event_id).await?;

    match current_list(pool, event_id, volunteer_id).await? {
        None => return Err(AppError::not_found("registration", volunteer_id)),
        Some(VolunteerList::Attended) => {
            return Err(AppError::conflict("attendance is already recorded"));
        }
        Some(VolunteerList::Registered) => {}
    }

    let moved = event_volunteers_repo::mark_attended(pool, event_id, volunteer_id, hours).await?;
    if moved == 0 {
        return Err(AppError::conflict("attendance is already recorded"));
    }

    info!(event_id, volunteer_id, hours, "attendance_marked");
    Ok(())
}

async fn ensure_event(pool: &SqlitePool, event_id: &str) -> Result<(), AppError> {
    if events_repo::event_exists(pool, event_id).await? {
        Ok(())
    } else {
        Err(AppError::not_found("event", event_id))
    }
}

async fn current_list(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
) -> Result<Option<VolunteerList>, AppError> {
    let row = event_volunteers_repo::load_event_volunteer(pool, event_id, volunteer_id).await?;
    Ok(row.and_then(|r| VolunteerList::from_db(&r.list)))
}
