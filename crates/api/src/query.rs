//! Shared query parameter types for API handlers.

use dronefleet_core::pagination::PageRequest;
use serde::Deserialize;

/// Page-number pagination parameters (`?page=&page_size=`).
///
/// Values are clamped by [`PageRequest::new`]; each listing supplies its
/// own default page size.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl PageParams {
    pub fn to_request(&self, default_size: i64) -> PageRequest {
        PageRequest::new(self.page, self.page_size, default_size)
    }
}
