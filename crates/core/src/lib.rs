//! Core domain types for Catalog.
//!
//! This crate contains pure domain logic with ZERO web or database dependencies.
//! Input shapes, listing allow-lists, and the page envelope live here so every
//! adapter validates against the same rules.
//!
//! # Modules
//!
//! - `resource` - Resource status, inputs, listing query, and page envelope

pub mod resource;
