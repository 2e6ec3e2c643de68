//! Common types used across the application.

pub mod pagination;

pub use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageRequest};
