//! Shared helpers for database integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use catalog_core::resource::CreateResourceInput;
use catalog_db::entities::resources;
use catalog_db::{ResourceService, SessionProvider};
use catalog_shared::DatabaseConfig;

/// Single-connection in-memory `SQLite` config with schema sync enabled.
pub fn sqlite_config() -> DatabaseConfig {
    DatabaseConfig {
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::with_url("sqlite::memory:")
    }
}

/// Multi-connection `SQLite` config over a fresh database file.
pub fn sqlite_file_config(connections: u32) -> (DatabaseConfig, std::path::PathBuf) {
    let path = std::env::temp_dir().join(format!("catalog-{}.db", uuid::Uuid::now_v7()));
    let config = DatabaseConfig {
        max_connections: connections,
        min_connections: connections,
        ..DatabaseConfig::with_url(format!("sqlite://{}?mode=rwc", path.display()))
    };
    (config, path)
}

/// Initialized provider over a fresh in-memory database.
pub async fn provider() -> Arc<SessionProvider> {
    let sessions = Arc::new(SessionProvider::new());
    sessions
        .initialize(&sqlite_config())
        .await
        .expect("Failed to initialize session provider");
    sessions
}

/// Service over a fresh in-memory database.
pub async fn service() -> ResourceService {
    ResourceService::new(provider().await)
}

/// Creates resources with the given names, in order.
pub async fn seed(service: &ResourceService, names: &[&str]) -> Vec<resources::Model> {
    let mut created = Vec::with_capacity(names.len());
    for name in names {
        let resource = service
            .create(CreateResourceInput::named(*name))
            .await
            .expect("Failed to create resource");
        created.push(resource);
    }
    created
}
