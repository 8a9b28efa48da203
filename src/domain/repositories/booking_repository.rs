//! Repository trait for bookings.

use crate::domain::entities::{
    Booking, BookingFilter, BookingPatch, NewBooking, PageRequest, Paginated,
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Repository interface for bookings.
///
/// Bookings are never deleted; cancellation is a status update.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgBookingRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Inserts a pending booking.
    ///
    /// The slot is re-checked while holding a lock on the service row, so
    /// two concurrent requests for the same window cannot both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if an open booking overlaps the window.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_booking: NewBooking) -> Result<Booking, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError>;

    /// Lists bookings ordered by `start_time` descending.
    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Paginated<Booking>, AppError>;

    /// Returns true if an open (pending or confirmed) booking of the service
    /// overlaps `[start, end)`. `exclude` skips the booking being rescheduled.
    async fn has_overlap(
        &self,
        service_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError>;

    /// Applies a partial update. A new time window is re-checked for
    /// overlaps under the same lock as [`BookingRepository::create`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::Conflict`] if the new window overlaps, or if the
    /// status stored at write time does not allow the change.
    async fn update(&self, id: Uuid, patch: BookingPatch) -> Result<Booking, AppError>;
}
