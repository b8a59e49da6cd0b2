//! Page-number pagination for listing endpoints.
//!
//! Pages are 1-based. Page sizes are clamped to `1..=MAX_PAGE_SIZE` and a
//! page past the end yields an empty item list rather than an error.

use serde::Serialize;

/// Default page size for medication listings.
pub const MEDICATION_PAGE_SIZE: i64 = 5;

/// Default page size for drone listings.
pub const DRONE_PAGE_SIZE: i64 = 3;

/// Upper bound for any caller-supplied page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Clamp a user-provided page size to `1..=max`, using `default` when absent.
pub fn clamp_page_size(page_size: Option<i64>, default: i64, max: i64) -> i64 {
    page_size.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided page number to at least 1.
pub fn clamp_page(page: Option<i64>) -> i64 {
    page.unwrap_or(1).max(1)
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, page_size: Option<i64>, default_size: i64) -> Self {
        Self {
            page: clamp_page(page),
            page_size: clamp_page_size(page_size, default_size, MAX_PAGE_SIZE),
        }
    }

    /// SQL `LIMIT`.
    pub fn limit(&self) -> i64 {
        self.page_size
    }

    /// SQL `OFFSET`.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Slice an already-materialized, ordered collection.
    pub fn slice<T: Clone>(&self, items: &[T]) -> Page<T> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX);
        let page_items = items
            .iter()
            .skip(start)
            .take(self.page_size as usize)
            .cloned()
            .collect();
        Page::new(page_items, *self, items.len() as i64)
    }
}

/// Pagination metadata returned alongside a page of items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

/// One page of an ordered listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub info: PageInfo,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        let total = total.max(0);
        let total_pages = (total + request.page_size - 1) / request.page_size;
        Self {
            items,
            info: PageInfo {
                page: request.page,
                page_size: request.page_size,
                total,
                total_pages,
            },
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            info: self.info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- clamp_page_size ----------------------------------------------------

    #[test]
    fn page_size_uses_default_when_none() {
        assert_eq!(clamp_page_size(None, DRONE_PAGE_SIZE, MAX_PAGE_SIZE), 3);
        assert_eq!(clamp_page_size(None, MEDICATION_PAGE_SIZE, MAX_PAGE_SIZE), 5);
    }

    #[test]
    fn page_size_respects_max() {
        assert_eq!(clamp_page_size(Some(500), 3, MAX_PAGE_SIZE), 100);
    }

    #[test]
    fn page_size_floors_at_one() {
        assert_eq!(clamp_page_size(Some(0), 3, MAX_PAGE_SIZE), 1);
        assert_eq!(clamp_page_size(Some(-4), 3, MAX_PAGE_SIZE), 1);
    }

    // -- PageRequest --------------------------------------------------------

    #[test]
    fn offset_is_zero_for_first_page() {
        let req = PageRequest::new(None, None, DRONE_PAGE_SIZE);
        assert_eq!(req.page, 1);
        assert_eq!(req.offset(), 0);
        assert_eq!(req.limit(), 3);
    }

    #[test]
    fn offset_advances_by_page_size() {
        let req = PageRequest::new(Some(3), Some(10), DRONE_PAGE_SIZE);
        assert_eq!(req.offset(), 20);
    }

    #[test]
    fn negative_page_clamped() {
        assert_eq!(PageRequest::new(Some(-2), None, 5).page, 1);
    }

    #[test]
    fn slice_second_page() {
        let items: Vec<i32> = (1..=7).collect();
        let page = PageRequest::new(Some(2), Some(3), 3).slice(&items);
        assert_eq!(page.items, vec![4, 5, 6]);
        assert_eq!(page.info.total, 7);
        assert_eq!(page.info.total_pages, 3);
    }

    #[test]
    fn slice_past_end_is_empty() {
        let items = vec![1, 2];
        let page = PageRequest::new(Some(9), Some(3), 3).slice(&items);
        assert!(page.items.is_empty());
        assert_eq!(page.info.total, 2);
        assert_eq!(page.info.total_pages, 1);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let page = PageRequest::new(None, None, 3).slice::<i32>(&[]);
        assert_eq!(page.info.total_pages, 0);
    }

    #[test]
    fn map_keeps_info() {
        let page = PageRequest::new(None, None, 3).slice(&[1, 2]).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.info.total, 2);
    }
}
