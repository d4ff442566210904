use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::error::AppError;
use crate::services::event_volunteers_service::{self, VolunteerPage};
use crate::services::registration_service;
use crate::web::middleware::auth::AuthenticatedUser;

#[derive(Debug, Deserialize, Default)]
pub struct VolunteersPageQuery {
    pub page: Option<i64>,
    pub search: Option<String>,
}

pub async fn event_volunteers_handler(
    Path(event_id): Path<String>,
    query: Result<Query<VolunteersPageQuery>, QueryRejection>,
    State(pool): State<SqlitePool>,
) -> Result<Json<VolunteerPage>, AppError> {
    let Query(query) = query?;
    event_volunteers_service::load_event_volunteers_page(
        &pool,
        &event_id,
        query.page.unwrap_or(0),
        query.search.as_deref(),
    )
    .await
    .map(Json)
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationBody {
    /// Defaults to the signed-in volunteer.
    pub volunteer_id: Option<String>,
}

pub async fn register_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    body: Option<Json<RegistrationBody>>,
) -> Result<StatusCode, AppError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let subject = body.volunteer_id.as_deref().unwrap_or(&auth_user.id);
    if !auth_user.can_act_for(subject) {
        warn!(actor = %auth_user.id, subject, "register: actor may not act for subject");
        return Err(AppError::Forbidden);
    }

    registration_service::register_volunteer(&pool, &event_id, subject).await?;
    Ok(StatusCode::CREATED)
}

pub async fn unregister_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path((event_id, volunteer_id)): Path<(String, String)>,
    State(pool): State<SqlitePool>,
) -> Result<StatusCode, AppError> {
    if !auth_user.can_act_for(&volunteer_id) {
        warn!(actor = %auth_user.id, subject = %volunteer_id, "unregister: actor may not act for subject");
        return Err(AppError::Forbidden);
    }

    registration_service::unregister_volunteer(&pool, &event_id, &volunteer_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceBody {
    pub volunteer_id: String,
    pub hours: f64,
}

pub async fn attendance_handler(
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(body): Json<AttendanceBody>,
) -> Result<StatusCode, AppError> {
    registration_service::mark_attended(&pool, &event_id, &body.volunteer_id, body.hours).await?;
    Ok(StatusCode::NO_CONTENT)
}
