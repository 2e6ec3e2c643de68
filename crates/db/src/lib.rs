//! Database layer with `SeaORM` entities, repositories, and services.
//!
//! This crate provides:
//! - `SeaORM` entity definitions and migrations
//! - The session provider and unit-of-work scoping
//! - The listing filter builder
//! - The resource repository and the transactional resource service

pub mod entities;
pub mod filter;
pub mod migration;
pub mod repositories;
pub mod services;
pub mod session;

pub use repositories::{ResourceError, ResourceRepository, ResourceStore};
pub use services::ResourceService;
pub use session::{Session, SessionError, SessionProvider, UnitOfWork};
