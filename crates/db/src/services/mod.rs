//! Transactional services over repositories.

pub mod resource;

pub use resource::ResourceService;
