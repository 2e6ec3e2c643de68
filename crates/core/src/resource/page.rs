//! Page envelope returned by paginated listing.

use serde::{Deserialize, Serialize};

use super::query::{ResourceQuery, SearchField, SortField, SortOrder};

/// One page of results plus the paging and filter inputs that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePage<T> {
    /// Items on this page, in query order.
    pub data: Vec<T>,
    /// Number of matching items across all pages.
    pub total: u64,
    /// Page number (1-indexed).
    pub page: u64,
    /// Page size.
    pub limit: u64,
    /// Search text.
    pub search: String,
    /// Searched column.
    pub search_by: SearchField,
    /// Sort direction.
    pub order: SortOrder,
    /// Sort column.
    pub order_by: SortField,
    /// Whether soft-deleted items were included.
    pub include_deleted: bool,
}

impl<T> ResourcePage<T> {
    /// Builds an envelope echoing the query that produced `data`.
    ///
    /// `page` and `limit` are echoed after normalization.
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, query: &ResourceQuery) -> Self {
        let request = query.page_request();
        Self {
            data,
            total,
            page: request.page,
            limit: request.limit,
            search: query.search.clone(),
            search_by: query.search_by,
            order: query.order,
            order_by: query.order_by,
            include_deleted: query.include_deleted,
        }
    }

    /// Number of pages at this page size (at least 1).
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        catalog_shared::types::PageRequest::new(self.page, self.limit).total_pages(self.total)
    }

    /// Returns true when no later page can hold more items.
    #[must_use]
    pub fn is_last_page(&self) -> bool {
        self.page >= self.total_pages()
    }
}
