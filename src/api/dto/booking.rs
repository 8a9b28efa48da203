//! DTOs for bookings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::dto::pagination::PaginationParams;
use crate::domain::entities::{Booking, BookingFilter, BookingPatch, BookingStatus};

#[derive(Debug, Serialize, ToSchema)]
pub struct BookingResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user_id: b.user_id,
            service_id: b.service_id,
            start_time: b.start_time,
            end_time: b.end_time,
            status: b.status,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

/// Request body for `POST /api/bookings`.
///
/// Times are RFC 3339; the window is half-open `[start_time, end_time)`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBookingRequest {
    pub service_id: Uuid,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

/// Request body for `PATCH /api/bookings/{id}`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateBookingRequest {
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: Option<BookingStatus>,
}

impl From<UpdateBookingRequest> for BookingPatch {
    fn from(r: UpdateBookingRequest) -> Self {
        Self {
            start_time: r.start_time,
            end_time: r.end_time,
            status: r.status,
        }
    }
}

/// Request body for `PATCH /api/admin/bookings/{id}/status`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetStatusRequest {
    pub status: BookingStatus,
}

/// Query parameters for `GET /api/bookings`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub service_id: Option<Uuid>,
    /// Only bookings starting at or after this instant.
    pub from: Option<DateTime<Utc>>,
    /// Only bookings starting before this instant.
    pub to: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl BookingListQuery {
    pub fn filter(&self) -> BookingFilter {
        BookingFilter {
            user_id: None,
            service_id: self.service_id,
            status: self.status,
            from: self.from,
            to: self.to,
        }
    }
}

/// Query parameters for `GET /api/admin/bookings`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminBookingListQuery {
    pub user_id: Option<Uuid>,
    pub service_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl AdminBookingListQuery {
    pub fn filter(&self) -> BookingFilter {
        BookingFilter {
            user_id: self.user_id,
            service_id: self.service_id,
            status: self.status,
            from: self.from,
            to: self.to,
        }
    }
}

/// Query parameters for `GET /api/services/{id}/bookings`.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceBookingsQuery {
    pub status: Option<BookingStatus>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}
