use serde::{Deserialize, Serialize};

/// Pagination parameters for collection getters.
///
/// Always available to handlers through the request scope; transports
/// that pass nothing get the defaults (first page, 30 items).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Pagination {
            // page numbers are 1-based
            page: page.max(1),
            per_page,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    pub fn limit(&self) -> usize {
        self.per_page as usize
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: 1,
            per_page: 30,
        }
    }
}

/// A slice of a collection plus the total count when the backend knows
/// it; what a collection getter returns.
#[derive(Debug, Clone, PartialEq)]
pub struct PageItems<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total: Option<u64>,
}

impl<T> PageItems<T> {
    pub fn new(items: Vec<T>) -> Self {
        PageItems { items, total: None }
    }

    pub fn with_total(self, total: u64) -> Self {
        PageItems {
            total: Some(total),
            ..self
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn total(&self) -> Option<u64> {
        self.total
    }
}
