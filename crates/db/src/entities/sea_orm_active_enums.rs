//! `SeaORM` active enums.

use catalog_core::resource::ResourceStatus as DomainStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Stored resource status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "UPPERCASE")]
pub enum ResourceStatus {
    /// Resource is in use.
    #[default]
    #[sea_orm(string_value = "ACTIVE")]
    Active,
    /// Resource is parked.
    #[sea_orm(string_value = "INACTIVE")]
    Inactive,
}

impl From<DomainStatus> for ResourceStatus {
    fn from(status: DomainStatus) -> Self {
        match status {
            DomainStatus::Active => Self::Active,
            DomainStatus::Inactive => Self::Inactive,
        }
    }
}

impl From<ResourceStatus> for DomainStatus {
    fn from(status: ResourceStatus) -> Self {
        match status {
            ResourceStatus::Active => Self::Active,
            ResourceStatus::Inactive => Self::Inactive,
        }
    }
}
