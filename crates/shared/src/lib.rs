//! Shared types, errors, and configuration for Catalog.
//!
//! This crate provides common types used across all other crates:
//! - Pagination request normalization for list operations
//! - Application-wide error type with transport status mapping
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, LoggingConfig, SeedConfig};
pub use error::{AppError, AppResult, ErrorBody};
