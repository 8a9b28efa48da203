//! Repository trait for service listings.

use crate::domain::entities::{
    NewService, PageRequest, Paginated, Service, ServiceFilter, ServicePatch,
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for bookable services.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgServiceRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceRepository: Send + Sync {
    async fn create(&self, new_service: NewService) -> Result<Service, AppError>;

    /// Finds a service by ID, including inactive ones.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError>;

    /// Lists services matching `filter`, newest first.
    async fn list(
        &self,
        filter: ServiceFilter,
        page: PageRequest,
    ) -> Result<Paginated<Service>, AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service does not exist.
    async fn update(&self, id: Uuid, patch: ServicePatch) -> Result<Service, AppError>;

    /// Soft-deletes a service by clearing `is_active`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service does not exist or is
    /// already inactive.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}
