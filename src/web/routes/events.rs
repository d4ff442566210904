use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

use crate::error::AppError;
use crate::services::events_service::{self, EventInput, EventView, EventsQuery};
use crate::services::pagination::Paginated;

pub async fn list_events_handler(
    query: Result<Query<EventsQuery>, QueryRejection>,
    State(pool): State<SqlitePool>,
) -> Result<Json<Paginated<EventView>>, AppError> {
    let Query(query) = query?;
    events_service::list_events(&pool, &query).await.map(Json)
}

pub async fn event_detail_handler(
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<Json<EventView>, AppError> {
    events_service::load_event(&pool, &event_id).await.map(Json)
}

pub async fn create_event_handler(
    State(pool): State<SqlitePool>,
    Json(input): Json<EventInput>,
) -> Result<(StatusCode, Json<EventView>), AppError> {
    let view = events_service::create_event(&pool, &input).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub async fn update_event_handler(
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
    Json(input): Json<EventInput>,
) -> Result<Json<EventView>, AppError> {
    events_service::update_event(&pool, &event_id, &input)
        .await
        .map(Json)
}

pub async fn delete_event_handler(
    Path(event_id): Path<String>,
    State(pool): State<SqlitePool>,
) -> Result<StatusCode, AppError> {
    events_service::delete_event(&pool, &event_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
