pub mod middleware;
pub mod routes;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use http::header::{HeaderValue, CACHE_CONTROL};
use sqlx::SqlitePool;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;

use self::middleware::auth as auth_middleware;
use self::routes::{event_volunteers, events, health, volunteers};

pub fn router(pool: SqlitePool) -> Router {
    // Admin routes, checked after require_auth has identified the caller
    let admin_routes = Router::new()
        .route("/api/admin/events", post(events::create_event_handler))
        .route(
            "/api/admin/events/:event_id",
            put(events::update_event_handler).delete(events::delete_event_handler),
        )
        .route(
            "/api/admin/events/:event_id/attendance",
            post(event_volunteers::attendance_handler),
        )
        .layer(axum_middleware::from_fn(auth_middleware::require_admin));

    // Signed-in volunteers and admins
    let protected_routes = Router::new()
        .route(
            "/api/events/:event_id/registrations",
            post(event_volunteers::register_handler),
        )
        .route(
            "/api/events/:event_id/registrations/:volunteer_id",
            delete(event_volunteers::unregister_handler),
        )
        .route(
            "/api/volunteers/:volunteer_id",
            get(volunteers::volunteer_profile_handler),
        )
        .merge(admin_routes)
        .layer(axum_middleware::from_fn(auth_middleware::require_auth));

    Router::new()
        // Public routes
        .route("/api/health", get(health::health_handler))
        .route("/api/events", get(events::list_events_handler))
        .route("/api/events/:event_id", get(events::event_detail_handler))
        .route(
            "/api/events/:event_id/volunteers",
            get(event_volunteers::event_volunteers_handler),
        )
        .route("/api/volunteers", post(volunteers::create_volunteer_handler))
        // Protected routes
        .merge(protected_routes)
        // Layers
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(CatchPanicLayer::new())
        // State
        .with_state(pool)
}
