//! Seed helpers shared by the unit tests.

use sqlx::SqlitePool;

use super::{event_volunteers_repo, events_repo, volunteers_repo};

pub async fn pool() -> SqlitePool {
    super::memory_pool().await.expect("memory pool")
}

pub async fn seed_event(pool: &SqlitePool, event_id: &str, title: &str, starts_at: &str) {
    events_repo::insert_event(
        pool,
        events_repo::NewEvent {
            event_id,
            title,
            description: None,
            location: None,
            starts_at,
            ends_at: None,
        },
    )
    .await
    .expect("insert event");
}

pub async fn seed_volunteer(pool: &SqlitePool, volunteer_id: &str, name: &str) {
    let email = format!("{}@example.org", volunteer_id);
    volunteers_repo::insert_volunteer(
        pool,
        volunteers_repo::NewVolunteer {
            volunteer_id,
            name,
            email: &email,
            phone: None,
        },
    )
    .await
    .expect("insert volunteer");
}

pub async fn seed_registered(pool: &SqlitePool, event_id: &str, volunteer_id: &str, name: &str) {
    seed_volunteer(pool, volunteer_id, name).await;
    event_volunteers_repo::insert_registration(pool, event_id, volunteer_id)
        .await
        .expect("insert registration");
}

pub async fn seed_attended(
    pool: &SqlitePool,
    event_id: &str,
    volunteer_id: &str,
    name: &str,
    hours: f64,
) {
    seed_registered(pool, event_id, volunteer_id, name).await;
    event_volunteers_repo::mark_attended(pool, event_id, volunteer_id, hours)
        .await
        .expect("mark attended");
}
