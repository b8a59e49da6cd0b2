//! Shared response envelope types for API handlers.
//!
//! All API responses use a `{ "data": ... }` envelope. Listings add a
//! `pagination` block next to `data`.

use dronefleet_core::pagination::{Page, PageInfo};
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": [T], "pagination": {...} }` envelope for listings.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}

impl<T: Serialize> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            data: page.items,
            pagination: page.info,
        }
    }
}
