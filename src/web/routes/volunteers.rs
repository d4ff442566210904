use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::services::volunteers_service::{
    self, VolunteerInput, VolunteerProfileView, VolunteerView,
};
use crate::web::middleware::auth::AuthenticatedUser;

pub async fn create_volunteer_handler(
    State(pool): State<SqlitePool>,
    Json(input): Json<VolunteerInput>,
) -> Result<(StatusCode, Json<VolunteerView>), AppError> {
    let view = volunteers_service::create_volunteer(&pool, &input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn volunteer_profile_handler(
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(volunteer_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<VolunteerProfileView>, AppError> {
    if !auth_user.can_act_for(&volunteer_id) {
        return Err(AppError::Forbidden);
    }
    volunteers_service::load_volunteer_profile(&pool, &volunteer_id)
        .await
        .map(Json)
}
