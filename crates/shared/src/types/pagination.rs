//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

/// Upper bound for `per_page`; larger requests are clamped.
pub const MAX_PER_PAGE: u32 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Number of items per page.
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    20
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl PageRequest {
    /// Builds a request from optional query values, applying defaults and bounds.
    #[must_use]
    pub fn from_query(page: Option<u32>, per_page: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or_else(default_page),
            per_page: per_page.unwrap_or_else(default_per_page),
        }
        .normalized()
    }

    /// Clamps page to >= 1 and per_page to `1..=MAX_PER_PAGE`.
    #[must_use]
    pub fn normalized(self) -> Self {
        Self {
            page: self.page.max(1),
            per_page: self.per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// Zero-indexed page number, as expected by ORM paginators.
    #[must_use]
    pub fn page_index(&self) -> u64 {
        u64::from(self.page.saturating_sub(1))
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page_index() * u64::from(self.per_page)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        u64::from(self.per_page)
    }
}

/// Response wrapper for paginated data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResponse<T> {
    /// The items in the current page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

/// Pagination metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    /// Current page number.
    pub page: u32,
    /// Items per page.
    pub per_page: u32,
    /// Total number of items across all pages.
    pub total: u64,
    /// Total number of pages.
    pub total_pages: u64,
}

impl<T> PageResponse<T> {
    /// Creates a new paginated response.
    #[must_use]
    pub fn new(data: Vec<T>, request: &PageRequest, total: u64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            total.div_ceil(u64::from(request.per_page.max(1)))
        };

        Self {
            data,
            meta: PageMeta {
                page: request.page,
                per_page: request.per_page,
                total,
                total_pages,
            },
        }
    }

    /// Maps the items of the page, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> PageResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PageResponse {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_default() {
        let request = PageRequest::default();
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 20);
    }

    #[test]
    fn test_page_request_offset() {
        let request = PageRequest {
            page: 2,
            per_page: 20,
        };
        assert_eq!(request.offset(), 20);
        assert_eq!(request.page_index(), 1);
        assert_eq!(request.limit(), 20);
    }

    #[test]
    fn test_from_query_clamps_values() {
        let request = PageRequest::from_query(Some(0), Some(1000));
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, MAX_PER_PAGE);

        let request = PageRequest::from_query(None, Some(0));
        assert_eq!(request.per_page, 1);
    }

    #[test]
    fn test_page_response_pagination() {
        // 25 items, 10 per page -> 3 pages
        let request = PageRequest {
            page: 1,
            per_page: 10,
        };
        let response: PageResponse<i32> = PageResponse::new(vec![], &request, 25);
        assert_eq!(response.meta.total_pages, 3);
    }

    #[test]
    fn test_page_response_empty() {
        let response: PageResponse<i32> = PageResponse::new(vec![], &PageRequest::default(), 0);
        assert_eq!(response.meta.total_pages, 1);
    }

    #[test]
    fn test_page_response_map() {
        let response = PageResponse::new(vec![1, 2, 3], &PageRequest::default(), 3);
        let mapped = response.map(|n| n * 10);
        assert_eq!(mapped.data, vec![10, 20, 30]);
        assert_eq!(mapped.meta.total, 3);
    }
}
