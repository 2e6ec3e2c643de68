//! Database migrations.
//!
//! Migrations are managed using sea-orm-migration and are written with the
//! schema builder so they run on both `PostgreSQL` and `SQLite`.

pub use sea_orm_migration::prelude::*;

mod m20261016_000001_resources;

/// Migrator for running database migrations.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20261016_000001_resources::Migration)]
    }
}
