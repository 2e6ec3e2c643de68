//! Listing query for resources.
//!
//! Search and sort columns are closed enums, so only allow-listed columns can
//! ever reach the storage layer. Raw string parameters go through
//! [`ResourceQuery::try_from`], which rejects anything outside the allow-lists.

use std::fmt;
use std::str::FromStr;

use catalog_shared::AppError;
use catalog_shared::types::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageRequest};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing listing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Page must be at least 1.
    #[error("page must be at least 1, got {0}")]
    InvalidPage(u64),

    /// Limit must be between 1 and the maximum page size.
    #[error("limit must be between 1 and 100, got {0}")]
    InvalidLimit(u64),

    /// Column is not searchable.
    #[error("searchBy must be one of name, description; got '{0}'")]
    UnsupportedSearchField(String),

    /// Column is not sortable.
    #[error("orderBy must be one of created_at, updated_at, name, description; got '{0}'")]
    UnsupportedSortField(String),

    /// Sort direction is not ASC or DESC.
    #[error("order must be ASC or DESC; got '{0}'")]
    InvalidSortOrder(String),
}

impl From<QueryError> for AppError {
    fn from(err: QueryError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Columns that may be searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    /// The `name` column.
    #[default]
    Name,
    /// The `description` column.
    Description,
}

impl SearchField {
    /// Returns the column name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Description => "description",
        }
    }
}

impl FromStr for SearchField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            other => Err(QueryError::UnsupportedSearchField(other.to_string())),
        }
    }
}

/// Columns that may be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// The `created_at` column.
    #[default]
    CreatedAt,
    /// The `updated_at` column.
    UpdatedAt,
    /// The `name` column.
    Name,
    /// The `description` column.
    Description,
}

impl SortField {
    /// Returns the column name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Name => "name",
            Self::Description => "description",
        }
    }
}

impl FromStr for SortField {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "updated_at" => Ok(Self::UpdatedAt),
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            other => Err(QueryError::UnsupportedSortField(other.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => f.write_str("ASC"),
            Self::Desc => f.write_str("DESC"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("asc") {
            Ok(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Ok(Self::Desc)
        } else {
            Err(QueryError::InvalidSortOrder(s.to_string()))
        }
    }
}

/// Typed listing query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceQuery {
    /// Page number (1-indexed). Ignored by unbounded listing.
    pub page: u64,
    /// Page size. Ignored by unbounded listing.
    pub limit: u64,
    /// Substring to search for; empty means no search.
    pub search: String,
    /// Column searched by `search`.
    pub search_by: SearchField,
    /// Sort direction.
    pub order: SortOrder,
    /// Sort column.
    pub order_by: SortField,
    /// Include soft-deleted resources.
    pub include_deleted: bool,
}

impl Default for ResourceQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            search: String::new(),
            search_by: SearchField::default(),
            order: SortOrder::default(),
            order_by: SortField::default(),
            include_deleted: false,
        }
    }
}

impl ResourceQuery {
    /// Returns the normalized page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.limit)
    }

    /// Returns the search text, or `None` when no search was requested.
    #[must_use]
    pub fn search_text(&self) -> Option<&str> {
        if self.search.is_empty() {
            None
        } else {
            Some(&self.search)
        }
    }

    /// Sets the search text and column.
    #[must_use]
    pub fn searching(mut self, search: impl Into<String>, search_by: SearchField) -> Self {
        self.search = search.into();
        self.search_by = search_by;
        self
    }

    /// Sets the sort column and direction.
    #[must_use]
    pub const fn sorted_by(mut self, order_by: SortField, order: SortOrder) -> Self {
        self.order_by = order_by;
        self.order = order;
        self
    }

    /// Sets the page and page size.
    #[must_use]
    pub const fn paged(mut self, page: u64, limit: u64) -> Self {
        self.page = page;
        self.limit = limit;
        self
    }

    /// Sets whether soft-deleted resources are included.
    #[must_use]
    pub const fn including_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }
}

/// Raw listing parameters as received from a caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceQueryParams {
    /// Page number.
    pub page: Option<u64>,
    /// Page size.
    pub limit: Option<u64>,
    /// Search text.
    pub search: Option<String>,
    /// Search column name.
    pub search_by: Option<String>,
    /// Sort direction, case-insensitive.
    pub order: Option<String>,
    /// Sort column name.
    pub order_by: Option<String>,
    /// Include soft-deleted resources.
    pub include_deleted: Option<bool>,
}

impl TryFrom<ResourceQueryParams> for ResourceQuery {
    type Error = QueryError;

    fn try_from(params: ResourceQueryParams) -> Result<Self, Self::Error> {
        let page = params.page.unwrap_or(DEFAULT_PAGE);
        if page < 1 {
            return Err(QueryError::InvalidPage(page));
        }

        let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(QueryError::InvalidLimit(limit));
        }

        let search_by = params
            .search_by
            .as_deref()
            .map(str::parse::<SearchField>)
            .transpose()?
            .unwrap_or_default();
        let order = params
            .order
            .as_deref()
            .map(str::parse::<SortOrder>)
            .transpose()?
            .unwrap_or_default();
        let order_by = params
            .order_by
            .as_deref()
            .map(str::parse::<SortField>)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            page,
            limit,
            search: params.search.unwrap_or_default(),
            search_by,
            order,
            order_by,
            include_deleted: params.include_deleted.unwrap_or(false),
        })
    }
}
