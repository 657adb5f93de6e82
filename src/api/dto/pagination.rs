//! Paged response wrapper.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Page;

/// Generic paged response wrapper.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PagedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaginationMeta {
    /// Current page number (1-based)
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 10)]
    pub limit: i64,
    /// Total number of items across all pages
    #[schema(example = 100)]
    pub total_items: i64,
    #[schema(example = 10)]
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T, U: From<T>> From<Page<T>> for PagedResponse<U> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        let pagination = PaginationMeta {
            page: page.page,
            limit: page.limit,
            total_items: page.total,
            total_pages,
            has_next: page.page < total_pages,
            has_prev: page.page > 1,
        };

        Self {
            data: page.items.into_iter().map(U::from).collect(),
            pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_from_page() {
        let response: PagedResponse<i64> = Page::new(vec![1_i32, 2], 25, 2, 10).into();
        assert_eq!(response.data, vec![1, 2]);
        assert_eq!(response.pagination.total_pages, 3);
        assert!(response.pagination.has_next);
        assert!(response.pagination.has_prev);
    }

    #[test]
    fn test_last_page_has_no_next() {
        let response: PagedResponse<i32> = Page::<i32>::new(vec![], 20, 2, 10).into();
        assert!(!response.pagination.has_next);
    }
}
