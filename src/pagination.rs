//! This module defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

/// The page number to default to when not specified in a request.
pub const DEFAULT_PAGE: u64 = 1;
/// The number of items per page when not specified in a request.
pub const DEFAULT_PAGE_SIZE: u64 = 10;
/// The maximum number of items a single page may hold.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Pagination parameters parsed from a request's query string.
///
///// Out-of-range values are not rejected: a page below 1 is treated as page 1
/// and a page size above [MAX_PAGE_SIZE] is clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationParams {
    /// The 1-indexed page to return.
    pub page: u64,
    /// The number of items per page.
    pub page_size: u64,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationParams {
    /// The effective page number, never below 1.
    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    /// The effective page size, clamped to `1..=`[MAX_PAGE_SIZE].
    pub fn page_size(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    /// The number of rows to skip for this page.
    pub fn offset(&self) -> u64 {
        (self.page() - 1) * self.page_size()
    }
}

/// One page of query results along with the paging bookkeeping the client
/// needs to render pagination controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    /// The items on this page.
    pub data: Vec<T>,
    /// The 1-indexed page these items came from.
    pub current_page: u64,
    /// The page size used for the query.
    pub page_size: u64,
    /// The total number of items across all pages.
    pub total_count: u64,
    /// The total number of pages.
    pub total_pages: u64,
    /// Whether a previous page exists.
    pub has_previous: bool,
    /// Whether a next page exists.
    pub has_next: bool,
}

impl<T> PaginatedResult<T> {
    /// Assemble a page of results from the items, the request parameters and
    /// the total row count.
    pub fn new(data: Vec<T>, params: PaginationParams, total_count: u64) -> Self {
        let current_page = params.page();
        let page_size = params.page_size();
        let total_pages = total_count.div_ceil(page_size);

        Self {
            data,
            current_page,
            page_size,
            total_count,
            total_pages,
            has_previous: current_page > 1,
            has_next: current_page < total_pages,
        }
    }
}
