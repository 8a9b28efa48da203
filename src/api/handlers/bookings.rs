//! Handlers for bookings: the caller's own and the admin views.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::api::dto::booking::{
    AdminBookingListQuery, BookingListQuery, BookingResponse, CreateBookingRequest,
    SetStatusRequest, UpdateBookingRequest,
};
use crate::api::dto::pagination::ListResponse;
use crate::api::dto::review::ReviewResponse;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::middleware::{AdminUser, CurrentUser};
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Books a time slot of a service.
///
/// # Endpoint
///
/// `POST /api/bookings`
///
/// # Request Body
///
/// ```json
/// {
///   "service_id": "6f1c2b1e-8a3a-4b5e-9a0e-0a3f1e6f2b11",
///   "start_time": "2030-01-01T10:00:00Z",
///   "end_time": "2030-01-01T11:00:00Z"
/// }
/// ```
///
/// # Errors
///
/// - **400**: Start in the past or `end_time <= start_time`
/// - **404**: Service missing or inactive
/// - **409**: Slot overlaps a pending or confirmed booking
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid time window", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Service not found", body = ErrorBody),
        (status = 409, description = "Slot already booked", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_booking_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = state
        .booking_service
        .create(
            &user,
            payload.service_id,
            payload.start_time,
            payload.end_time,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(booking.into())))
}

/// Lists the caller's bookings, latest start first.
///
/// # Endpoint
///
/// `GET /api/bookings?status=pending&from=2030-01-01T00:00:00Z`
#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = "Bookings",
    params(BookingListQuery),
    responses(
        (status = 200, description = "Caller's bookings", body = ListResponse<BookingResponse>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_bookings_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(query): ApiQuery<BookingListQuery>,
) -> Result<Json<ListResponse<BookingResponse>>, AppError> {
    let page = query.pagination.to_page_request()?;
    let bookings = state
        .booking_service
        .list_mine(&user, query.filter(), page)
        .await?;

    Ok(Json(ListResponse::from_page(bookings, &query.pagination)))
}

/// Returns one booking. Owner or admin.
///
/// # Endpoint
///
/// `GET /api/bookings/{id}`
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking", body = BookingResponse),
        (status = 403, description = "Not your booking", body = ErrorBody),
        (status = 404, description = "Booking not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_booking_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.booking_service.get(&user, id).await?;
    Ok(Json(booking.into()))
}

/// Reschedules a booking and/or changes its status.
///
/// # Endpoint
///
/// `PATCH /api/bookings/{id}`
///
/// # Status Changes
///
/// Owners may only cancel, and only before the start time. Admins may
/// confirm, complete or cancel. `completed` and `cancelled` are final.
#[utoipa::path(
    patch,
    path = "/api/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = UpdateBookingRequest,
    responses(
        (status = 200, description = "Booking updated", body = BookingResponse),
        (status = 400, description = "Invalid window or empty body", body = ErrorBody),
        (status = 403, description = "Not allowed", body = ErrorBody),
        (status = 404, description = "Booking not found", body = ErrorBody),
        (status = 409, description = "Illegal transition or slot taken", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_booking_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateBookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .booking_service
        .update(&user, id, payload.into())
        .await?;

    Ok(Json(booking.into()))
}

/// Cancels a booking. The booking is kept with status `cancelled`.
///
/// # Endpoint
///
/// `DELETE /api/bookings/{id}`
#[utoipa::path(
    delete,
    path = "/api/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingResponse),
        (status = 400, description = "Booking already started", body = ErrorBody),
        (status = 403, description = "Not your booking", body = ErrorBody),
        (status = 404, description = "Booking not found", body = ErrorBody),
        (status = 409, description = "Booking already final", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn cancel_booking_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.booking_service.cancel(&user, id).await?;
    Ok(Json(booking.into()))
}

/// Returns the review left for a booking. Owner or admin.
///
/// # Endpoint
///
/// `GET /api/bookings/{id}/review`
#[utoipa::path(
    get,
    path = "/api/bookings/{id}/review",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 403, description = "Not your booking", body = ErrorBody),
        (status = 404, description = "Booking or review not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn booking_review_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = state.review_service.get_for_booking(&user, id).await?;
    Ok(Json(review.into()))
}

/// Lists every booking.
///
/// # Endpoint
///
/// `GET /api/admin/bookings?user_id=...&status=confirmed`
#[utoipa::path(
    get,
    path = "/api/admin/bookings",
    tag = "Admin",
    params(AdminBookingListQuery),
    responses(
        (status = 200, description = "Bookings", body = ListResponse<BookingResponse>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_list_bookings_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiQuery(query): ApiQuery<AdminBookingListQuery>,
) -> Result<Json<ListResponse<BookingResponse>>, AppError> {
    let page = query.pagination.to_page_request()?;
    let bookings = state
        .booking_service
        .list_all(&admin, query.filter(), page)
        .await?;

    Ok(Json(ListResponse::from_page(bookings, &query.pagination)))
}

/// Moves a booking along its lifecycle.
///
/// # Endpoint
///
/// `PATCH /api/admin/bookings/{id}/status`
///
/// ```json
/// { "status": "completed" }
/// ```
#[utoipa::path(
    patch,
    path = "/api/admin/bookings/{id}/status",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Booking ID")),
    request_body = SetStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = BookingResponse),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "Booking not found", body = ErrorBody),
        (status = 409, description = "Illegal transition", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_booking_status_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<SetStatusRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state
        .booking_service
        .set_status(&admin, id, payload.status)
        .await?;

    Ok(Json(booking.into()))
}
