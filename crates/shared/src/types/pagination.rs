//! Pagination types for list operations.

use serde::{Deserialize, Serialize};

/// Default page number.
pub const DEFAULT_PAGE: u64 = 1;
/// Default number of items per page.
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest page size a caller may request.
pub const MAX_LIMIT: u64 = 100;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-indexed).
    #[serde(default = "default_page")]
    pub page: u64,
    /// Number of items per page.
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}

impl PageRequest {
    /// Creates a page request, clamping page to at least 1 and limit to `1..=MAX_LIMIT`.
    #[must_use]
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }

    /// Calculates the offset for database queries.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of pages needed to cover `total` items (at least 1).
    #[must_use]
    pub fn total_pages(&self, total: u64) -> u64 {
        if total == 0 || self.limit == 0 {
            1
        } else {
            total.div_ceil(self.limit)
        }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
