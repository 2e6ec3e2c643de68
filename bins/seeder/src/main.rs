//! Database seeder for Catalog development and testing.
//!
//! Seeds `seed.count` resources with generated names. Every fifth resource is
//! marked inactive and every seventh is soft-deleted, so listing filters have
//! something to exclude.
//!
//! Usage: cargo run --bin seeder

use std::sync::Arc;

use catalog_core::resource::{
    CreateResourceInput, ResourceQuery, ResourceStatus, UpdateResourceInput,
};
use catalog_db::{ResourceService, SessionProvider};
use catalog_shared::{AppConfig, LoggingConfig};
use fake::Fake;
use fake::faker::company::en::{CatchPhrase, CompanyName};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    init_tracing(&config.logging);

    let sessions = Arc::new(SessionProvider::new());
    sessions.initialize(&config.database).await?;
    let service = ResourceService::new(sessions);

    info!(count = config.seed.count, "Seeding resources");
    for i in 1..=config.seed.count {
        let name: String = CompanyName().fake();
        let description: String = CatchPhrase().fake();
        let created = service
            .create(CreateResourceInput::named(name).with_description(description))
            .await?;

        if i % 5 == 0 {
            service
                .update(
                    created.id,
                    UpdateResourceInput {
                        status: Some(ResourceStatus::Inactive),
                        ..Default::default()
                    },
                )
                .await?;
        }
        if i % 7 == 0 {
            service.soft_delete(created.id).await?;
        }
    }

    let page = service.find_paginated(&ResourceQuery::default()).await?;
    info!(
        total = page.total,
        pages = page.total_pages(),
        "Seeding complete"
    );

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.filter.as_str().into());
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}
