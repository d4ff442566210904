//! Paged listing of an event's volunteers.
//!
//! An event keeps two disjoint, name-sorted lists: volunteers who registered
//! and volunteers who attended. Pages run over the concatenation
//! registered-then-attended, so one page may draw from both lists. The
//! response says how many of its rows came from the registered side, letting
//! callers render attendance status per row without another query.

use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::database::{event_volunteers_repo, events_repo};
use crate::error::AppError;
use crate::models::VolunteerList;
use crate::services::pagination::{self, LikeMode};
use crate::services::volunteers_service::VolunteerView;

pub const PAGE_SIZE: i64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerPage {
    pub volunteers: Vec<VolunteerView>,
    /// Leading rows of `volunteers` that are registered but not yet attended.
    pub registered_count: i64,
}

/// Rows to fetch from one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    pub registered: Option<Window>,
    pub attended: Option<Window>,
}

/// Splits the page starting at row `start` between the two lists, given how
/// many volunteers are still in the registered list.
pub fn plan_page(total_registered: i64, start: i64, page_size: i64) -> PagePlan {
    let end = start.saturating_add(page_size);

    if total_registered >= end {
        return PagePlan {
            registered: Some(Window {
                offset: start,
                limit: page_size,
            }),
            attended: None,
        };
    }

    if total_registered > start {
        // `start` is a multiple of the page size, so the remainder is exactly
        // what is left of the registered list.
        let registered_portion = total_registered % page_size;
        return PagePlan {
            registered: Some(Window {
                offset: start,
                limit: registered_portion,
            }),
            attended: Some(Window {
                offset: 0,
                limit: page_size - registered_portion,
            }),
        };
    }

    PagePlan {
        registered: None,
        attended: Some(Window {
            offset: start - total_registered,
            limit: page_size,
        }),
    }
}

pub async fn load_event_volunteers_page(
    pool: &SqlitePool,
    event_id: &str,
    page: i64,
    search: Option<&str>,
) -> Result<VolunteerPage, AppError> {
    load_event_volunteers_page_sized(pool, event_id, page, search, PAGE_SIZE).await
}

/// `search` is a case-insensitive name prefix applied to both lists.
pub async fn load_event_volunteers_page_sized(
    pool: &SqlitePool,
    event_id: &str,
    page: i64,
    search: Option<&str>,
    page_size: i64,
) -> Result<VolunteerPage, AppError> {
    let event_id = event_id.trim();
    if event_id.is_empty() {
        return Err(AppError::invalid("event id is required"));
    }
    if !events_repo::event_exists(pool, event_id).await? {
        return Err(AppError::not_found("event", event_id));
    }

    let start = pagination::offset(page, page_size)?;
    let name_like = pagination::search_like(search, LikeMode::Prefix);

    let total_registered = event_volunteers_repo::count_event_volunteers(
        pool,
        event_id,
        VolunteerList::Registered,
        &name_like,
    )
    .await?;
    let plan = plan_page(total_registered, start, page_size);

    let mut volunteers = Vec::new();
    if let Some(w) = plan.registered {
        let rows = event_volunteers_repo::list_event_volunteers(
            pool,
            event_id,
            VolunteerList::Registered,
            &name_like,
            w.offset,
            w.limit,
        )
        .await?;
        volunteers.extend(rows.into_iter().map(VolunteerView::from));
    }
    let registered_count = volunteers.len() as i64;

    if let Some(w) = plan.attended {
        let rows = event_volunteers_repo::list_event_volunteers(
            pool,
            event_id,
            VolunteerList::Attended,
            &name_like,
            w.offset,
            w.limit,
        )
        .await?;
        volunteers.extend(rows.into_iter().map(VolunteerView::from));
    }

    debug!(
        event_id,
        page,
        total_registered,
        returned = volunteers.len(),
        registered_count,
        "event_volunteers_page"
    );

    Ok(VolunteerPage {
        volunteers,
        registered_count,
    })
}
