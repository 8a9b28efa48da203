//! Service catalog: public browsing and admin management of bookable services.

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::require_admin;
use crate::domain::entities::{
    NewService, PageRequest, Paginated, Service, ServiceFilter, ServicePatch, User,
};
use crate::domain::repositories::ServiceRepository;
use crate::error::AppError;

fn check_price_range(filter: &ServiceFilter) -> Result<(), AppError> {
    if let (Some(min), Some(max)) = (filter.price_min, filter.price_max)
        && min > max
    {
        return Err(AppError::bad_request(
            "price_min must not exceed price_max",
            json!({"price_min": min, "price_max": max}),
        ));
    }
    Ok(())
}

pub struct CatalogService<R: ServiceRepository> {
    repository: Arc<R>,
}

impl<R: ServiceRepository> CatalogService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists active services. Any `is_active` or `owner_id` in the filter is
    /// overridden.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `price_min > price_max`.
    pub async fn list_public(
        &self,
        filter: ServiceFilter,
        page: PageRequest,
    ) -> Result<Paginated<Service>, AppError> {
        check_price_range(&filter)?;
        let filter = ServiceFilter {
            is_active: Some(true),
            owner_id: None,
            ..filter
        };
        self.repository.list(filter, page).await
    }

    /// Fetches an active service. Inactive services look missing to the public.
    pub async fn get_public(&self, id: Uuid) -> Result<Service, AppError> {
        match self.repository.find_by_id(id).await? {
            Some(service) if service.is_active => Ok(service),
            _ => Err(AppError::not_found(
                "Service not found",
                json!({"id": id}),
            )),
        }
    }

    /// Fetches a service regardless of its active flag.
    pub async fn get_any(&self, id: Uuid) -> Result<Service, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Service not found", json!({"id": id})))
    }

    /// Lists all services including inactive ones. Admin only.
    pub async fn list_admin(
        &self,
        actor: &User,
        filter: ServiceFilter,
        page: PageRequest,
    ) -> Result<Paginated<Service>, AppError> {
        require_admin(actor, "list all services")?;
        check_price_range(&filter)?;
        self.repository.list(filter, page).await
    }

    /// Reads any service including inactive ones. Admin only.
    pub async fn get_admin(&self, actor: &User, id: Uuid) -> Result<Service, AppError> {
        require_admin(actor, "view service")?;
        self.get_any(id).await
    }

    /// Creates a service owned by the calling admin.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admins.
    #[tracing::instrument(skip(self, actor, name, description, category), fields(actor_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &User,
        name: String,
        description: Option<String>,
        category: Option<String>,
        price: f64,
        duration_minutes: i32,
    ) -> Result<Service, AppError> {
        require_admin(actor, "create service")?;

        let service = self
            .repository
            .create(NewService {
                name,
                description,
                category,
                price,
                duration_minutes,
                owner_id: actor.id,
            })
            .await?;

        tracing::info!(service_id = %service.id, "Service created");
        metrics::counter!("bookit_services_created_total").increment(1);
        Ok(service)
    }

    /// Partially updates a service. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty patch.
    /// Returns [`AppError::NotFound`] if the service does not exist.
    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        patch: ServicePatch,
    ) -> Result<Service, AppError> {
        require_admin(actor, "update service")?;

        if patch.is_empty() {
            return Err(AppError::bad_request(
                "No fields to update",
                json!({"id": id}),
            ));
        }

        self.repository.update(id, patch).await
    }

    /// Soft-deletes a service. Existing bookings and reviews keep referencing it.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admins.
    /// Returns [`AppError::NotFound`] if the service is missing or already inactive.
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        require_admin(actor, "delete service")?;
        self.repository.delete(id).await?;
        tracing::info!(service_id = %id, actor_id = %actor.id, "Service deactivated");
        Ok(())
    }
}
