//! Resource domain: status, mutation inputs, listing query, and page envelope.

pub mod page;
pub mod query;
pub mod types;

pub use page::ResourcePage;
pub use query::{QueryError, ResourceQuery, ResourceQueryParams, SearchField, SortField, SortOrder};
pub use types::{CreateResourceInput, ResourceStatus, UnknownStatus, UpdateResourceInput};
