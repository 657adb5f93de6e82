use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Effective `(page, limit)` for optional request values.
pub fn normalize_paging(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    (
        page.unwrap_or(1).max(1),
        limit.unwrap_or(DEFAULT_PAGE_LIMIT).clamp(1, MAX_PAGE_LIMIT),
    )
}

/// One page of records plus the total count across all pages.
///
/// This is the value stored in the cache for list reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, page: i64, limit: i64) -> Self {
        Self {
            items,
            total,
            page,
            limit,
        }
    }

    pub fn total_pages(&self) -> i64 {
        if self.limit <= 0 {
            return 0;
        }
        (self.total + self.limit - 1) / self.limit
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_paging_defaults_and_bounds() {
        assert_eq!(normalize_paging(None, None), (1, 10));
        assert_eq!(normalize_paging(Some(0), Some(500)), (1, 100));
        assert_eq!(normalize_paging(Some(3), Some(25)), (3, 25));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(Page::<i32>::new(vec![], 21, 1, 10).total_pages(), 3);
        assert_eq!(Page::<i32>::new(vec![], 20, 1, 10).total_pages(), 2);
        assert_eq!(Page::<i32>::new(vec![], 0, 1, 10).total_pages(), 0);
    }
}
