//! Resource service implementation.
//!
//! The service is the only component that opens transactions. Each mutation
//! re-checks existence and applies the change inside one unit of work, so the
//! check and the write commit or roll back together.

use std::sync::Arc;

use catalog_core::resource::{CreateResourceInput, ResourcePage, ResourceQuery, UpdateResourceInput};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::entities::resources;
use crate::repositories::{ResourceError, ResourceRepository, ResourceStore};
use crate::session::SessionProvider;

/// Resource service for lifecycle operations.
pub struct ResourceService<R: ResourceStore = ResourceRepository> {
    sessions: Arc<SessionProvider>,
    repo: Arc<R>,
}

impl ResourceService {
    /// Creates a service backed by the `SeaORM` repository.
    #[must_use]
    pub fn new(sessions: Arc<SessionProvider>) -> Self {
        let repo = Arc::new(ResourceRepository::new(Arc::clone(&sessions)));
        Self { sessions, repo }
    }
}

impl<R: ResourceStore> Clone for ResourceService<R> {
    fn clone(&self) -> Self {
        Self {
            sessions: Arc::clone(&self.sessions),
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: ResourceStore + 'static> ResourceService<R> {
    /// Creates a service over a custom store.
    #[must_use]
    pub const fn with_repository(sessions: Arc<SessionProvider>, repo: Arc<R>) -> Self {
        Self { sessions, repo }
    }

    /// Creates a resource.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input fails validation
    /// - The insert fails
    pub async fn create(
        &self,
        input: CreateResourceInput,
    ) -> Result<resources::Model, ResourceError> {
        input
            .validate()
            .map_err(|e| ResourceError::Validation(e.to_string()))?;

        let repo = Arc::clone(&self.repo);
        let created = self
            .sessions
            .run_in_transaction::<_, _, ResourceError>(move |uow| {
                Box::pin(async move { repo.create(Some(uow), input).await })
            })
            .await?;

        info!(resource_id = %created.id, "Resource created");
        Ok(created)
    }

    /// Applies a partial update to a live resource.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The input fails validation
    /// - The resource does not exist or is soft-deleted
    /// - The update fails
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateResourceInput,
    ) -> Result<resources::Model, ResourceError> {
        input
            .validate()
            .map_err(|e| ResourceError::Validation(e.to_string()))?;

        let repo = Arc::clone(&self.repo);
        let updated = self
            .sessions
            .run_in_transaction::<_, _, ResourceError>(move |uow| {
                Box::pin(async move {
                    repo.find_by_id(Some(uow), id, false)
                        .await?
                        .ok_or(ResourceError::NotFound(id))?;
                    repo.update(Some(uow), id, input).await
                })
            })
            .await?;

        info!(resource_id = %id, "Resource updated");
        Ok(updated)
    }

    /// Soft-deletes a live resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource does not exist, is already deleted,
    /// or the write fails.
    pub async fn soft_delete(&self, id: Uuid) -> Result<bool, ResourceError> {
        let repo = Arc::clone(&self.repo);
        let deleted = self
            .sessions
            .run_in_transaction::<_, _, ResourceError>(move |uow| {
                Box::pin(async move {
                    repo.find_by_id(Some(uow), id, false)
                        .await?
                        .ok_or(ResourceError::NotFound(id))?;
                    repo.soft_delete(Some(uow), id).await
                })
            })
            .await?;

        info!(resource_id = %id, "Resource soft-deleted");
        Ok(deleted)
    }

    /// Restores a resource. Restoring a live resource succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource does not exist or the write fails.
    pub async fn restore(&self, id: Uuid) -> Result<bool, ResourceError> {
        let repo = Arc::clone(&self.repo);
        let restored = self
            .sessions
            .run_in_transaction::<_, _, ResourceError>(move |uow| {
                Box::pin(async move {
                    repo.find_by_id(Some(uow), id, true)
                        .await?
                        .ok_or(ResourceError::NotFound(id))?;
                    repo.restore(Some(uow), id).await
                })
            })
            .await?;

        info!(resource_id = %id, "Resource restored");
        Ok(restored)
    }

    /// Permanently deletes a resource, soft-deleted or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource does not exist or no row was removed.
    pub async fn hard_delete(&self, id: Uuid) -> Result<bool, ResourceError> {
        let repo = Arc::clone(&self.repo);
        let removed = self
            .sessions
            .run_in_transaction::<_, _, ResourceError>(move |uow| {
                Box::pin(async move {
                    repo.find_by_id(Some(uow), id, true)
                        .await?
                        .ok_or(ResourceError::NotFound(id))?;
                    repo.hard_delete(Some(uow), id).await
                })
            })
            .await?;

        info!(resource_id = %id, "Resource hard-deleted");
        Ok(removed)
    }

    /// Lists every matching resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_all(
        &self,
        query: &ResourceQuery,
    ) -> Result<Vec<resources::Model>, ResourceError> {
        self.repo.find_all(None, query).await
    }

    /// Returns one page of matching resources.
    ///
    /// Count and page are read from one snapshot, so `total` agrees with the
    /// rows returned even under concurrent writes.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_paginated(
        &self,
        query: &ResourceQuery,
    ) -> Result<ResourcePage<resources::Model>, ResourceError> {
        let repo = Arc::clone(&self.repo);
        let query = query.clone();
        self.sessions
            .run_in_snapshot::<_, _, ResourceError>(move |uow| {
                Box::pin(async move { repo.find_paginated(Some(uow), &query).await })
            })
            .await
    }

    /// Finds a resource by ID.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::NotFound`] if no resource matches under the
    /// requested visibility.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<resources::Model, ResourceError> {
        self.repo
            .find_by_id(None, id, include_deleted)
            .await?
            .ok_or(ResourceError::NotFound(id))
    }
}
