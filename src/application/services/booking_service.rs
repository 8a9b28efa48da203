//! Booking lifecycle: creation, rescheduling, status changes and cancellation.

use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::{require_admin, require_owner_or_admin};
use crate::domain::entities::{
    Booking, BookingFilter, BookingPatch, BookingStatus, NewBooking, PageRequest, Paginated, User,
};
use crate::domain::repositories::{BookingRepository, ServiceRepository};
use crate::error::AppError;

/// Checks that a window lies in the future and is not empty.
fn validate_window(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), AppError> {
    if start <= Utc::now() {
        return Err(AppError::bad_request(
            "start_time must be in the future",
            json!({"start_time": start}),
        ));
    }
    if end <= start {
        return Err(AppError::bad_request(
            "end_time must be after start_time",
            json!({"start_time": start, "end_time": end}),
        ));
    }
    Ok(())
}

fn slot_taken(service_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> AppError {
    AppError::conflict(
        "Time slot is already booked",
        json!({"service_id": service_id, "start_time": start, "end_time": end}),
    )
}

/// Validates a status change for `actor` against the lifecycle graph.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] when a non-admin asks for a staff-only status.
/// Returns [`AppError::Conflict`] for a transition the graph does not allow.
/// Returns [`AppError::Validation`] when an owner cancels after the start time.
fn check_transition(actor: &User, booking: &Booking, next: BookingStatus) -> Result<(), AppError> {
    if next.requires_admin() && !actor.is_admin() {
        return Err(AppError::forbidden(
            "Only administrators can confirm or complete bookings",
            json!({"id": booking.id, "status": next}),
        ));
    }

    if !booking.status.can_transition_to(next) {
        return Err(AppError::conflict(
            format!(
                "Cannot change booking status from {} to {}",
                booking.status, next
            ),
            json!({"id": booking.id, "from": booking.status, "to": next}),
        ));
    }

    if next == BookingStatus::Cancelled && !actor.is_admin() && booking.has_started() {
        return Err(AppError::bad_request(
            "Bookings can only be cancelled before they start",
            json!({"id": booking.id, "start_time": booking.start_time}),
        ));
    }

    Ok(())
}

pub struct BookingService<B: BookingRepository, S: ServiceRepository> {
    bookings: Arc<B>,
    services: Arc<S>,
}

impl<B: BookingRepository, S: ServiceRepository> BookingService<B, S> {
    pub fn new(bookings: Arc<B>, services: Arc<S>) -> Self {
        Self { bookings, services }
    }

    /// Books a time slot for the caller. New bookings start as `pending`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a past or empty window.
    /// Returns [`AppError::NotFound`] if the service is missing or inactive.
    /// Returns [`AppError::Conflict`] if an open booking overlaps the window.
    #[tracing::instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn create(
        &self,
        actor: &User,
        service_id: Uuid,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        validate_window(start_time, end_time)?;

        match self.services.find_by_id(service_id).await? {
            Some(service) if service.is_active => {}
            _ => {
                return Err(AppError::not_found(
                    "Service not found",
                    json!({"id": service_id}),
                ));
            }
        }

        if self
            .bookings
            .has_overlap(service_id, start_time, end_time, None)
            .await?
        {
            return Err(slot_taken(service_id, start_time, end_time));
        }

        let booking = self
            .bookings
            .create(NewBooking {
                user_id: actor.id,
                service_id,
                start_time,
                end_time,
            })
            .await?;

        tracing::info!(booking_id = %booking.id, %service_id, "Booking created");
        metrics::counter!("bookit_bookings_created_total").increment(1);
        Ok(booking)
    }

    /// Fetches a booking visible to `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the booking does not exist.
    /// Returns [`AppError::Forbidden`] if the caller is neither owner nor admin.
    pub async fn get(&self, actor: &User, id: Uuid) -> Result<Booking, AppError> {
        let booking = self
            .bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found", json!({"id": id})))?;

        require_owner_or_admin(actor, booking.user_id, "booking", booking.id)?;
        Ok(booking)
    }

    /// Lists the caller's own bookings.
    pub async fn list_mine(
        &self,
        actor: &User,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Paginated<Booking>, AppError> {
        let filter = BookingFilter {
            user_id: Some(actor.id),
            ..filter
        };
        self.bookings.list(filter, page).await
    }

    /// Lists every booking. Admin only.
    pub async fn list_all(
        &self,
        actor: &User,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Paginated<Booking>, AppError> {
        require_admin(actor, "list all bookings")?;
        self.bookings.list(filter, page).await
    }

    /// Lists the bookings of one service. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the service does not exist.
    pub async fn list_for_service(
        &self,
        actor: &User,
        service_id: Uuid,
        status: Option<BookingStatus>,
        page: PageRequest,
    ) -> Result<Paginated<Booking>, AppError> {
        require_admin(actor, "list service bookings")?;

        if self.services.find_by_id(service_id).await?.is_none() {
            return Err(AppError::not_found(
                "Service not found",
                json!({"id": service_id}),
            ));
        }

        let filter = BookingFilter {
            service_id: Some(service_id),
            status,
            ..Default::default()
        };
        self.bookings.list(filter, page).await
    }

    /// Reschedules and/or changes the status of a booking.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an empty patch or an invalid window.
    /// Returns [`AppError::Forbidden`] if the caller may not touch the booking
    /// or requested a staff-only status.
    /// Returns [`AppError::Conflict`] for a closed booking, an illegal
    /// transition or an overlapping window.
    #[tracing::instrument(skip(self, actor, patch), fields(user_id = %actor.id))]
    pub async fn update(
        &self,
        actor: &User,
        id: Uuid,
        patch: BookingPatch,
    ) -> Result<Booking, AppError> {
        if !patch.is_reschedule() && patch.status.is_none() {
            return Err(AppError::bad_request(
                "No fields to update",
                json!({"id": id}),
            ));
        }

        let booking = self.get(actor, id).await?;

        if patch.is_reschedule() {
            if !booking.status.is_open() {
                return Err(AppError::conflict(
                    format!("Cannot reschedule a {} booking", booking.status),
                    json!({"id": id, "status": booking.status}),
                ));
            }

            let start = patch.start_time.unwrap_or(booking.start_time);
            let end = patch.end_time.unwrap_or(booking.end_time);
            validate_window(start, end)?;

            if self
                .bookings
                .has_overlap(booking.service_id, start, end, Some(id))
                .await?
            {
                return Err(slot_taken(booking.service_id, start, end));
            }
        }

        if let Some(next) = patch.status {
            check_transition(actor, &booking, next)?;
        }

        let updated = self.bookings.update(id, patch).await?;
        tracing::info!(booking_id = %id, status = %updated.status, "Booking updated");
        Ok(updated)
    }

    /// Sets a booking's status. Admin only.
    pub async fn set_status(
        &self,
        actor: &User,
        id: Uuid,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        require_admin(actor, "set booking status")?;
        self.update(
            actor,
            id,
            BookingPatch {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
    }

    /// Cancels a booking. The row is kept with status `cancelled`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when an owner cancels after the start time.
    /// Returns [`AppError::Conflict`] if the booking is already final.
    pub async fn cancel(&self, actor: &User, id: Uuid) -> Result<Booking, AppError> {
        let booking = self
            .update(
                actor,
                id,
                BookingPatch {
                    status: Some(BookingStatus::Cancelled),
                    ..Default::default()
                },
            )
            .await?;

        metrics::counter!("bookit_bookings_cancelled_total").increment(1);
        Ok(booking)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::booking;
    use super::*;
    use crate::application::access::test_support::{admin, member};
    use crate::application::services::catalog_service::test_support::service;
    use crate::domain::repositories::{MockBookingRepository, MockServiceRepository};
    use chrono::Duration;

    fn make_service(
        bookings: MockBookingRepository,
        services: MockServiceRepository,
    ) -> BookingService<MockBookingRepository, MockServiceRepository> {
        BookingService::new(Arc::new(bookings), Arc::new(services))
    }

    fn returning_booking(mock: &mut MockBookingRepository, b: Booking) {
        mock.expect_find_by_id()
            .returning(move |_| Ok(Some(b.clone())));
    }

    fn with_status(mut b: Booking, status: BookingStatus) -> Booking {
        b.status = status;
        b
    }

    // ─── CREATE ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_create_success() {
        let actor = member();
        let actor_id = actor.id;
        let start = Utc::now() + Duration::days(1);

        let mut services = MockServiceRepository::new();
        services
            .expect_find_by_id()
            .returning(|_| Ok(Some(service(true))));

        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_has_overlap()
            .withf(|_, _, _, exclude| exclude.is_none())
            .returning(|_, _, _, _| Ok(false));
        bookings
            .expect_create()
            .withf(move |b| b.user_id == actor_id)
            .times(1)
            .returning(move |b| Ok(booking(b.user_id, BookingStatus::Pending, 24)));

        let svc = make_service(bookings, services);

        let created = svc
            .create(&actor, Uuid::new_v4(), start, start + Duration::hours(1))
            .await
            .unwrap();

        assert_eq!(created.status, BookingStatus::Pending);
        assert_eq!(created.user_id, actor_id);
    }

    #[tokio::test]
    async fn test_create_in_the_past() {
        let start = Utc::now() - Duration::hours(1);
        let svc = make_service(MockBookingRepository::new(), MockServiceRepository::new());

        let result = svc
            .create(&member(), Uuid::new_v4(), start, start + Duration::hours(1))
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_end_before_start() {
        let start = Utc::now() + Duration::days(1);
        let svc = make_service(MockBookingRepository::new(), MockServiceRepository::new());

        let result = svc
            .create(&member(), Uuid::new_v4(), start, start)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_create_inactive_service() {
        let start = Utc::now() + Duration::days(1);

        let mut services = MockServiceRepository::new();
        services
            .expect_find_by_id()
            .returning(|_| Ok(Some(service(false))));

        let svc = make_service(MockBookingRepository::new(), services);

        let result = svc
            .create(&member(), Uuid::new_v4(), start, start + Duration::hours(1))
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_create_overlapping_slot() {
        let start = Utc::now() + Duration::days(1);

        let mut services = MockServiceRepository::new();
        services
            .expect_find_by_id()
            .returning(|_| Ok(Some(service(true))));

        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_has_overlap()
            .returning(|_, _, _, _| Ok(true));
        bookings.expect_create().times(0);

        let svc = make_service(bookings, services);

        let result = svc
            .create(&member(), Uuid::new_v4(), start, start + Duration::hours(1))
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    // ─── GET / LIST ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_get_foreign_booking_forbidden() {
        let mut bookings = MockBookingRepository::new();
        returning_booking(
            &mut bookings,
            booking(Uuid::new_v4(), BookingStatus::Pending, 24),
        );

        let svc = make_service(bookings, MockServiceRepository::new());

        let result = svc.get(&member(), Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_admin_gets_any_booking() {
        let mut bookings = MockBookingRepository::new();
        returning_booking(
            &mut bookings,
            booking(Uuid::new_v4(), BookingStatus::Pending, 24),
        );

        let svc = make_service(bookings, MockServiceRepository::new());

        assert!(svc.get(&admin(), Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_mine_scopes_to_caller() {
        let actor = member();
        let actor_id = actor.id;

        let mut bookings = MockBookingRepository::new();
        bookings
            .expect_list()
            .withf(move |filter, _| filter.user_id == Some(actor_id))
            .times(1)
            .returning(|_, _| Ok(Paginated::new(vec![], 0)));

        let svc = make_service(bookings, MockServiceRepository::new());

        let filter = BookingFilter {
            user_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(svc.list_mine(&actor, filter, PageRequest::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_list_for_missing_service() {
        let mut services = MockServiceRepository::new();
        services.expect_find_by_id().returning(|_| Ok(None));

        let svc = make_service(MockBookingRepository::new(), services);

        let result = svc
            .list_for_service(&admin(), Uuid::new_v4(), None, PageRequest::default())
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    // ─── STATUS ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_completed_cannot_go_back_to_pending() {
        let mut bookings = MockBookingRepository::new();
        returning_booking(
            &mut bookings,
            booking(Uuid::new_v4(), BookingStatus::Completed, -24),
        );
        bookings.expect_update().times(0);

        let svc = make_service(bookings, MockServiceRepository::new());

        let result = svc
            .set_status(&admin(), Uuid::new_v4(), BookingStatus::Pending)
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_admin_completes_booking() {
        let original = booking(Uuid::new_v4(), BookingStatus::Confirmed, -2);
        let completed = with_status(original.clone(), BookingStatus::Completed);

        let mut bookings = MockBookingRepository::new();
        returning_booking(&mut bookings, original);
        bookings
            .expect_update()
            .withf(|_, patch| patch.status == Some(BookingStatus::Completed))
            .times(1)
            .returning(move |_, _| Ok(completed.clone()));

        let svc = make_service(bookings, MockServiceRepository::new());

        let result = svc
            .set_status(&admin(), Uuid::new_v4(), BookingStatus::Completed)
            .await
            .unwrap();

        assert_eq!(result.status, BookingStatus::Completed);
    }

    #[tokio::test]
    async fn test_owner_cannot_confirm() {
        let actor = member();
        let mut bookings = MockBookingRepository::new();
        returning_booking(&mut bookings, booking(actor.id, BookingStatus::Pending, 24));
        bookings.expect_update().times(0);

        let svc = make_service(bookings, MockServiceRepository::new());

        let result = svc
            .update(
                &actor,
                Uuid::new_v4(),
                BookingPatch {
                    status: Some(BookingStatus::Confirmed),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_set_status_requires_admin() {
        let svc = make_service(MockBookingRepository::new(), MockServiceRepository::new());

        let result = svc
            .set_status(&member(), Uuid::new_v4(), BookingStatus::Confirmed)
            .await;

        assert!(matches!(result, Err(AppError::Forbidden { .. })));
    }

    #[tokio::test]
    async fn test_same_status_is_conflict() {
        let mut bookings = MockBookingRepository::new();
        returning_booking(
            &mut bookings,
            booking(Uuid::new_v4(), BookingStatus::Confirmed, 24),
        );

        let svc = make_service(bookings, MockServiceRepository::new());

        let result = svc
            .set_status(&admin(), Uuid::new_v4(), BookingStatus::Confirmed)
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    // ─── RESCHEDULE ──────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_reschedule_excludes_self_from_overlap() {
        let actor = member();
        let original = booking(actor.id, BookingStatus::Pending, 24);
        let id = original.id;
        let updated = original.clone();

        let mut bookings = MockBookingRepository::new();
        returning_booking(&mut bookings, original);
        bookings
            .expect_has_overlap()
            .withf(move |_, _, _, exclude| *exclude == Some(id))
            .times(1)
            .returning(|_, _, _, _| Ok(false));
        bookings
            .expect_update()
            .times(1)
            .returning(move |_, _| Ok(updated.clone()));

        let svc = make_service(bookings, MockServiceRepository::new());

        let new_start = Utc::now() + Duration::days(2);
        let result = svc
            .update(
                &actor,
                id,
                BookingPatch {
                    start_time: Some(new_start),
                    end_time: Some(new_start + Duration::hours(1)),
                    status: None,
                },
            )
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_reschedule_cancelled_booking() {
        let actor = member();
        let mut bookings = MockBookingRepository::new();
        returning_booking(&mut bookings, booking(actor.id, BookingStatus::Cancelled, 24));
        bookings.expect_has_overlap().times(0);

        let svc = make_service(bookings, MockServiceRepository::new());

        let new_start = Utc::now() + Duration::days(2);
        let result = svc
            .update(
                &actor,
                Uuid::new_v4(),
                BookingPatch {
                    start_time: Some(new_start),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_empty_patch() {
        let svc = make_service(MockBookingRepository::new(), MockServiceRepository::new());

        let result = svc
            .update(&member(), Uuid::new_v4(), BookingPatch::default())
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    // ─── CANCEL ──────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_owner_cancels_before_start() {
        let actor = member();
        let original = booking(actor.id, BookingStatus::Pending, 24);
        let cancelled = with_status(original.clone(), BookingStatus::Cancelled);

        let mut bookings = MockBookingRepository::new();
        returning_booking(&mut bookings, original);
        bookings
            .expect_update()
            .times(1)
            .returning(move |_, _| Ok(cancelled.clone()));

        let svc = make_service(bookings, MockServiceRepository::new());

        let result = svc.cancel(&actor, Uuid::new_v4()).await.unwrap();

        assert_eq!(result.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_owner_cannot_cancel_after_start() {
        let actor = member();
        let mut bookings = MockBookingRepository::new();
        returning_booking(&mut bookings, booking(actor.id, BookingStatus::Confirmed, -1));
        bookings.expect_update().times(0);

        let svc = make_service(bookings, MockServiceRepository::new());

        let result = svc.cancel(&actor, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_admin_cancels_after_start() {
        let original = booking(Uuid::new_v4(), BookingStatus::Confirmed, -1);
        let cancelled = with_status(original.clone(), BookingStatus::Cancelled);

        let mut bookings = MockBookingRepository::new();
        returning_booking(&mut bookings, original);
        bookings
            .expect_update()
            .returning(move |_, _| Ok(cancelled.clone()));

        let svc = make_service(bookings, MockServiceRepository::new());

        assert!(svc.cancel(&admin(), Uuid::new_v4()).await.is_ok());
    }

    #[tokio::test]
    async fn test_cancel_twice_is_conflict() {
        let actor = member();
        let mut bookings = MockBookingRepository::new();
        returning_booking(&mut bookings, booking(actor.id, BookingStatus::Cancelled, 24));

        let svc = make_service(bookings, MockServiceRepository::new());

        let result = svc.cancel(&actor, Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Conflict { .. })));
    }
}
