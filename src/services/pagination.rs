use serde::Serialize;

use crate::database::{escape_like, search_key};
use crate::error::AppError;

/// One page of a listing plus the totals a client needs to render pagers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if page_size > 0 {
            (total + page_size - 1) / page_size
        } else {
            0
        };
        Self {
            items,
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

pub fn validate_page(page: i64) -> Result<i64, AppError> {
    if page < 0 {
        return Err(AppError::invalid("page must be zero or greater"));
    }
    Ok(page)
}

/// Row offset of the first item on `page`.
pub fn offset(page: i64, page_size: i64) -> Result<i64, AppError> {
    if page_size <= 0 {
        return Err(AppError::invalid("page size must be positive"));
    }
    validate_page(page)?
        .checked_mul(page_size)
        .ok_or_else(|| AppError::invalid("page out of range"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeMode {
    Prefix,
    Contains,
}

/// Builds the lowercase LIKE pattern for a user search string. Returns an
/// empty string when there is nothing to filter on.
pub fn search_like(search: Option<&str>, mode: LikeMode) -> String {
    let q = search.map(str::trim).unwrap_or("");
    if q.is_empty() {
        return String::new();
    }
    let escaped = escape_like(&search_key(q));
    match mode {
        LikeMode::Prefix => format!("{escaped}%"),
        LikeMode::Contains => format!("%{escaped}%"),
    }
}
