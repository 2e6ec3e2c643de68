//! Resource repository for resource database operations.
//!
//! Every operation takes an optional [`UnitOfWork`]. When one is supplied all
//! I/O for the call runs inside its transaction, otherwise on the shared pool.

use std::sync::Arc;

use async_trait::async_trait;
use catalog_core::resource::{CreateResourceInput, ResourcePage, ResourceQuery, UpdateResourceInput};
use catalog_shared::AppError;
use sea_orm::entity::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Select, Set,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::entities::resources;
use crate::entities::sea_orm_active_enums::ResourceStatus;
use crate::filter::{
    apply_deleted_filter, apply_deleted_predicate, apply_search_filter, apply_sort_order,
};
use crate::session::{Session, SessionError, SessionProvider, UnitOfWork};

/// Error types for resource operations.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Resource not found under the requested visibility.
    #[error("Resource not found: {0}")]
    NotFound(Uuid),

    /// Input failed shape validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A write or delete did not take effect.
    #[error("{0}")]
    Persistence(String),

    /// The database is unreachable.
    #[error("Database connection error: {0}")]
    Connection(String),

    /// The session provider has not been initialized.
    #[error("Database session provider is not initialized")]
    NotInitialized,
}

impl From<DbErr> for ResourceError {
    fn from(err: DbErr) -> Self {
        match &err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::Connection(err.to_string()),
            _ => Self::Persistence(err.to_string()),
        }
    }
}

impl From<SessionError> for ResourceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotInitialized => Self::NotInitialized,
            SessionError::Connection(msg) => Self::Connection(msg),
            SessionError::AlreadyInitialized => {
                Self::Connection("Database session provider is already initialized".to_string())
            }
            SessionError::Migration(db) | SessionError::Transaction(db) => db.into(),
        }
    }
}

impl From<ResourceError> for AppError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound(id) => Self::NotFound(format!("Resource not found: {id}")),
            ResourceError::Validation(msg) => Self::Validation(msg),
            ResourceError::Persistence(msg) => Self::Database(msg),
            ResourceError::Connection(msg) => Self::Unavailable(msg),
            ResourceError::NotInitialized => {
                Self::Unavailable("Database session provider is not initialized".to_string())
            }
        }
    }
}

/// Maps a failed write to an operation-specific persistence error.
fn failed(action: &'static str) -> impl FnOnce(DbErr) -> ResourceError {
    move |err| match &err {
        DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => ResourceError::Connection(err.to_string()),
        _ => {
            warn!(error = %err, action, "Resource write failed");
            ResourceError::Persistence(format!("Failed to {action} resource: {err}"))
        }
    }
}

/// Next `updated_at` value; never earlier than `previous`.
fn touch(previous: DateTimeWithTimeZone) -> DateTimeWithTimeZone {
    let now: DateTimeWithTimeZone = chrono::Utc::now().into();
    now.max(previous)
}

/// Persistence operations on resources.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Persists a new resource and returns it with generated fields.
    async fn create(
        &self,
        uow: Option<&UnitOfWork>,
        input: CreateResourceInput,
    ) -> Result<resources::Model, ResourceError>;

    /// Finds a resource by ID. Soft-deleted rows are skipped unless
    /// `include_deleted` is set.
    async fn find_by_id(
        &self,
        uow: Option<&UnitOfWork>,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<resources::Model>, ResourceError>;

    /// Returns every resource matching the query filters, unpaged.
    async fn find_all(
        &self,
        uow: Option<&UnitOfWork>,
        query: &ResourceQuery,
    ) -> Result<Vec<resources::Model>, ResourceError>;

    /// Returns one page of matching resources plus the total match count.
    async fn find_paginated(
        &self,
        uow: Option<&UnitOfWork>,
        query: &ResourceQuery,
    ) -> Result<ResourcePage<resources::Model>, ResourceError>;

    /// Applies a partial update to a live resource.
    async fn update(
        &self,
        uow: Option<&UnitOfWork>,
        id: Uuid,
        input: UpdateResourceInput,
    ) -> Result<resources::Model, ResourceError>;

    /// Marks a live resource as deleted.
    async fn soft_delete(&self, uow: Option<&UnitOfWork>, id: Uuid)
    -> Result<bool, ResourceError>;

    /// Clears the deleted marker. Restoring a live resource succeeds without a write.
    async fn restore(&self, uow: Option<&UnitOfWork>, id: Uuid) -> Result<bool, ResourceError>;

    /// Removes the row permanently, whether or not it is soft-deleted.
    async fn hard_delete(&self, uow: Option<&UnitOfWork>, id: Uuid)
    -> Result<bool, ResourceError>;
}

/// `SeaORM`-backed resource repository.
#[derive(Debug, Clone)]
pub struct ResourceRepository {
    sessions: Arc<SessionProvider>,
}

impl ResourceRepository {
    /// Creates a new resource repository.
    #[must_use]
    pub const fn new(sessions: Arc<SessionProvider>) -> Self {
        Self { sessions }
    }

    async fn load(
        session: &Session<'_>,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<resources::Model>, DbErr> {
        let mut predicate = Condition::all().add(resources::Column::Id.eq(id));
        apply_deleted_predicate(&mut predicate, include_deleted);
        resources::Entity::find().filter(predicate).one(session).await
    }

    /// Base listing statement with deleted and search filters, unsorted.
    fn filtered(query: &ResourceQuery) -> Select<resources::Entity> {
        let mut select = resources::Entity::find();
        apply_deleted_filter(&mut select, query.include_deleted);
        apply_search_filter(&mut select, query.search_text(), Some(query.search_by));
        select
    }

    fn sorted(query: &ResourceQuery) -> Select<resources::Entity> {
        let mut select = Self::filtered(query);
        apply_sort_order(&mut select, Some(query.order), Some(query.order_by));
        select
    }
}

#[async_trait]
impl ResourceStore for ResourceRepository {
    async fn create(
        &self,
        uow: Option<&UnitOfWork>,
        input: CreateResourceInput,
    ) -> Result<resources::Model, ResourceError> {
        let session = self.sessions.session(uow)?;

        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let resource = resources::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name),
            description: Set(input.description),
            status: Set(ResourceStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
            is_deleted: Set(false),
        };

        let created = resource.insert(&session).await.map_err(failed("create"))?;
        debug!(resource_id = %created.id, "Inserted resource");
        Ok(created)
    }

    async fn find_by_id(
        &self,
        uow: Option<&UnitOfWork>,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<resources::Model>, ResourceError> {
        let session = self.sessions.session(uow)?;
        Ok(Self::load(&session, id, include_deleted).await?)
    }

    async fn find_all(
        &self,
        uow: Option<&UnitOfWork>,
        query: &ResourceQuery,
    ) -> Result<Vec<resources::Model>, ResourceError> {
        let session = self.sessions.session(uow)?;
        Ok(Self::sorted(query).all(&session).await?)
    }

    async fn find_paginated(
        &self,
        uow: Option<&UnitOfWork>,
        query: &ResourceQuery,
    ) -> Result<ResourcePage<resources::Model>, ResourceError> {
        let session = self.sessions.session(uow)?;
        let request = query.page_request();

        // Sorting does not affect the count.
        let total = Self::filtered(query).count(&session).await?;

        // Offsets past the last row never reach the driver, which binds them as i64.
        let offset = request.offset();
        let data = if offset >= total {
            Vec::new()
        } else {
            Self::sorted(query)
                .offset(offset)
                .limit(request.limit())
                .all(&session)
                .await?
        };

        Ok(ResourcePage::new(data, total, query))
    }

    async fn update(
        &self,
        uow: Option<&UnitOfWork>,
        id: Uuid,
        input: UpdateResourceInput,
    ) -> Result<resources::Model, ResourceError> {
        let session = self.sessions.session(uow)?;
        let existing = Self::load(&session, id, false)
            .await?
            .ok_or(ResourceError::NotFound(id))?;

        if input.is_empty() {
            return Ok(existing);
        }

        let previous = existing.updated_at;
        let mut active: resources::ActiveModel = existing.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(status) = input.status {
            active.status = Set(status.into());
        }
        active.updated_at = Set(touch(previous));

        let updated = active.update(&session).await.map_err(failed("update"))?;
        debug!(resource_id = %id, "Updated resource");
        Ok(updated)
    }

    async fn soft_delete(
        &self,
        uow: Option<&UnitOfWork>,
        id: Uuid,
    ) -> Result<bool, ResourceError> {
        let session = self.sessions.session(uow)?;
        let existing = Self::load(&session, id, false)
            .await?
            .ok_or(ResourceError::NotFound(id))?;

        let previous = existing.updated_at;
        let mut active: resources::ActiveModel = existing.into();
        active.is_deleted = Set(true);
        active.updated_at = Set(touch(previous));
        active.update(&session).await.map_err(failed("soft delete"))?;

        debug!(resource_id = %id, "Soft-deleted resource");
        Ok(true)
    }

    async fn restore(&self, uow: Option<&UnitOfWork>, id: Uuid) -> Result<bool, ResourceError> {
        let session = self.sessions.session(uow)?;
        let existing = Self::load(&session, id, true)
            .await?
            .ok_or(ResourceError::NotFound(id))?;

        if !existing.is_deleted {
            return Ok(true);
        }

        let previous = existing.updated_at;
        let mut active: resources::ActiveModel = existing.into();
        active.is_deleted = Set(false);
        active.updated_at = Set(touch(previous));
        active.update(&session).await.map_err(failed("restore"))?;

        debug!(resource_id = %id, "Restored resource");
        Ok(true)
    }

    async fn hard_delete(
        &self,
        uow: Option<&UnitOfWork>,
        id: Uuid,
    ) -> Result<bool, ResourceError> {
        let session = self.sessions.session(uow)?;
        Self::load(&session, id, true)
            .await?
            .ok_or(ResourceError::NotFound(id))?;

        let result = resources::Entity::delete_by_id(id)
            .exec(&session)
            .await
            .map_err(failed("hard delete"))?;
        if result.rows_affected == 0 {
            return Err(ResourceError::Persistence(
                "Failed to hard delete resource".to_string(),
            ));
        }

        debug!(resource_id = %id, "Hard-deleted resource");
        Ok(true)
    }
}
