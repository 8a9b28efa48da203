//! Reviews of completed bookings and per-service rating aggregates.

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::{require_admin, require_owner_or_admin};
use crate::domain::entities::{
    BookingStatus, NewReview, PageRequest, Paginated, RatingStats, Review, ReviewFilter,
    ReviewPatch, User,
};
use crate::domain::repositories::{BookingRepository, ReviewRepository, ServiceRepository};
use crate::error::AppError;

fn check_rating_range(filter: &ReviewFilter) -> Result<(), AppError> {
    if let (Some(min), Some(max)) = (filter.min_rating, filter.max_rating)
        && min > max
    {
        return Err(AppError::bad_request(
            "min_rating must not exceed max_rating",
            json!({"min_rating": min, "max_rating": max}),
        ));
    }
    Ok(())
}

pub struct ReviewService<R: ReviewRepository, B: BookingRepository, S: ServiceRepository> {
    reviews: Arc<R>,
    bookings: Arc<B>,
    services: Arc<S>,
}

impl<R, B, S> ReviewService<R, B, S>
where
    R: ReviewRepository,
    B: BookingRepository,
    S: ServiceRepository,
{
    pub fn new(reviews: Arc<R>, bookings: Arc<B>, services: Arc<S>) -> Self {
        Self {
            reviews,
            bookings,
            services,
        }
    }

    async fn ensure_service_exists(&self, service_id: Uuid) -> Result<(), AppError> {
        if self.services.find_by_id(service_id).await?.is_none() {
            return Err(AppError::not_found(
                "Service not found",
                json!({"id": service_id}),
            ));
        }
        Ok(())
    }

    /// Reviews one of the caller's completed bookings.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::Forbidden`] if the booking belongs to someone else.
    /// Returns [`AppError::Conflict`] if the booking is not completed or was
    /// already reviewed.
    #[tracing::instrument(skip(self, actor, comment), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &User,
        booking_id: Uuid,
        rating: i16,
        comment: Option<String>,
    ) -> Result<Review, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found", json!({"id": booking_id})))?;

        if !booking.is_owned_by(actor.id) {
            tracing::warn!(user_id = %actor.id, %booking_id, "Review attempt on foreign booking");
            return Err(AppError::forbidden(
                "Only the booking owner can review it",
                json!({"booking_id": booking_id}),
            ));
        }

        if booking.status != BookingStatus::Completed {
            return Err(AppError::conflict(
                "Only completed bookings can be reviewed",
                json!({"booking_id": booking_id, "status": booking.status}),
            ));
        }

        if self.reviews.find_by_booking(booking_id).await?.is_some() {
            return Err(AppError::conflict(
                "Booking already reviewed",
                json!({"booking_id": booking_id}),
            ));
        }

        let review = self
            .reviews
            .create(NewReview {
                booking_id,
                user_id: actor.id,
                service_id: booking.service_id,
                rating,
                comment,
            })
            .await?;

        tracing::info!(review_id = %review.id, %booking_id, rating, "Review created");
        metrics::counter!("bookit_reviews_created_total").increment(1);
        Ok(review)
    }

    /// Fetches a review. Reviews are public.
    pub async fn get(&self, id: Uuid) -> Result<Review, AppError> {
        self.reviews
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Review not found", json!({"id": id})))
    }

    /// Fetches the review attached to a booking the caller can see.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking or its review is missing.
    /// Returns [`AppError::Forbidden`] if the caller is neither owner nor admin.
    pub async fn get_for_booking(&self, actor: &User, booking_id: Uuid) -> Result<Review, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found", json!({"id": booking_id})))?;

        require_owner_or_admin(actor, booking.user_id, "booking", booking.id)?;

        self.reviews
            .find_by_booking(booking_id)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "Booking has no review",
                    json!({"booking_id": booking_id}),
                )
            })
    }

    /// Lists the reviews of a service.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service does not exist.
    pub async fn list_for_service(
        &self,
        service_id: Uuid,
        filter: ReviewFilter,
        page: PageRequest,
    ) -> Result<Paginated<Review>, AppError> {
        check_rating_range(&filter)?;
        self.ensure_service_exists(service_id).await?;

        let filter = ReviewFilter {
            service_id: Some(service_id),
            user_id: None,
            ..filter
        };
        self.reviews.list(filter, page).await
    }

    /// Rating aggregates for a service; zero count and nulls when unreviewed.
    pub async fn stats(&self, service_id: Uuid) -> Result<RatingStats, AppError> {
        self.ensure_service_exists(service_id).await?;
        self.reviews.rating_stats(service_id).await
    }

    /// Lists the caller's own reviews.
    pub async fn list_mine(
        &self,
        actor: &User,
        page: PageRequest,
    ) -> Result<Paginated<Review>, AppError> {
        let filter = ReviewFilter {
            user_id: Some(actor.id),
            ..Default::default()
        };
        self.reviews.list(filter, page).await
    }

    /// Lists every review. Admin only.
    pub async fn list_all(
        &self,
        actor: &User,
        filter: ReviewFilter,
        page: PageRequest,
    ) -> Result<Paginated<Review>, AppError> {
        require_admin(actor, "list all reviews")?;
        check_rating_range(&filter)?;
        self.reviews.list(filter, page).await
    }

    /// Lists the reviews written by one user. Admin only.
    pub async fn list_for_user(
        &self,
        actor: &User,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Paginated<Review>, AppError> {
        require_admin(actor, "list user reviews")?;
        let filter = ReviewFilter {
            user_id: Some(user_id),
            ..Default::default()
        };
        self.reviews.list(filter, page).await
    }

    /// Updates rating and/or comment. Author or admin.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty patch.
    /// Returns [`AppError::Forbidden`] if the caller did not write the review.
    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        patch: ReviewPatch,
    ) -> Result<Review, AppError> {
        if patch.rating.is_none() && patch.comment.is_none() {
            return Err(AppError::bad_request(
                "No fields to update",
                json!({"id": id}),
            ));
        }

        let review = self.get(id).await?;
        require_owner_or_admin(actor, review.user_id, "review", review.id)?;

        self.reviews.update(id, patch).await
    }

    /// Deletes a review permanently. Author or admin.
    pub async fn delete(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        let review = self.get(id).await?;
        require_owner_or_admin(actor, review.user_id, "review", review.id)?;

        self.reviews.delete(id).await?;
        tracing::info!(review_id = %id, actor_id = %actor.id, "Review deleted");
        Ok(())
    }
}
