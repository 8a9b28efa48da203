//! Repository trait for reviews.

use crate::domain::entities::{
    NewReview, PageRequest, Paginated, RatingStats, Review, ReviewFilter, ReviewPatch,
};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for reviews.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgReviewRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Creates a review.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the booking already has a review.
    async fn create(&self, new_review: NewReview) -> Result<Review, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError>;

    async fn find_by_booking(&self, booking_id: Uuid) -> Result<Option<Review>, AppError>;

    /// Lists reviews newest first.
    async fn list(
        &self,
        filter: ReviewFilter,
        page: PageRequest,
    ) -> Result<Paginated<Review>, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the review does not exist.
    async fn update(&self, id: Uuid, patch: ReviewPatch) -> Result<Review, AppError>;

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the review does not exist.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;

    /// Count, average, minimum and maximum rating for a service.
    async fn rating_stats(&self, service_id: Uuid) -> Result<RatingStats, AppError>;
}
