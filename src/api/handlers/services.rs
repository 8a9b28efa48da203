//! Handlers for the service catalog: public browsing and admin management.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::booking::{BookingResponse, ServiceBookingsQuery};
use crate::api::dto::pagination::ListResponse;
use crate::api::dto::review::{RatingStatsResponse, ReviewResponse, ServiceReviewsQuery};
use crate::api::dto::service::{
    AdminServiceListQuery, CreateServiceRequest, ServiceListQuery, ServiceResponse,
    UpdateServiceRequest,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::middleware::AdminUser;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Lists active services.
///
/// # Endpoint
///
/// `GET /api/services?q=massage&category=wellness&price_min=10&price_max=80&page=1`
///
/// # Errors
///
/// - **400**: Invalid pagination or `price_min > price_max`
#[utoipa::path(
    get,
    path = "/api/services",
    tag = "Services",
    params(ServiceListQuery),
    responses(
        (status = 200, description = "Active services", body = ListResponse<ServiceResponse>),
        (status = 400, description = "Invalid filter", body = ErrorBody)
    )
)]
pub async fn list_services_handler(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ServiceListQuery>,
) -> Result<Json<ListResponse<ServiceResponse>>, AppError> {
    let page = query.pagination.to_page_request()?;
    let services = state
        .catalog_service
        .list_public(query.filter(), page)
        .await?;

    Ok(Json(ListResponse::from_page(services, &query.pagination)))
}

/// Returns one active service.
///
/// # Endpoint
///
/// `GET /api/services/{id}`
#[utoipa::path(
    get,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ServiceResponse),
        (status = 404, description = "Service not found or inactive", body = ErrorBody)
    )
)]
pub async fn get_service_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ServiceResponse>, AppError> {
    let service = state.catalog_service.get_public(id).await?;
    Ok(Json(service.into()))
}

/// Creates a service owned by the calling admin.
///
/// # Endpoint
///
/// `POST /api/services`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Deep tissue massage",
///   "description": "60 minutes, oils included",
///   "category": "wellness",
///   "price": 49.90,
///   "duration_minutes": 60
/// }
/// ```
#[utoipa::path(
    post,
    path = "/api/services",
    tag = "Services",
    request_body = CreateServiceRequest,
    responses(
        (status = 201, description = "Service created", body = ServiceResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_service_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiJson(payload): ApiJson<CreateServiceRequest>,
) -> Result<(StatusCode, Json<ServiceResponse>), AppError> {
    payload.validate()?;

    let service = state
        .catalog_service
        .create(
            &admin,
            payload.name,
            payload.description,
            payload.category,
            payload.price,
            payload.duration_minutes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(service.into())))
}

/// Partially updates a service.
///
/// # Endpoint
///
/// `PATCH /api/services/{id}`
///
/// # Request Body
///
/// All fields are optional. `description` and `category` accept `null` to
/// clear the value; `is_active: true` restores a deleted service.
#[utoipa::path(
    patch,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service updated", body = ServiceResponse),
        (status = 400, description = "Validation error or empty body", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "Service not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_service_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateServiceRequest>,
) -> Result<Json<ServiceResponse>, AppError> {
    payload.validate()?;

    let service = state
        .catalog_service
        .update(&admin, id, payload.into())
        .await?;

    Ok(Json(service.into()))
}

/// Soft-deletes a service. Existing bookings keep their reference.
///
/// # Endpoint
///
/// `DELETE /api/services/{id}`
#[utoipa::path(
    delete,
    path = "/api/services/{id}",
    tag = "Services",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 204, description = "Service deactivated"),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "Service not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_service_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog_service.delete(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists the reviews of a service, newest first.
///
/// # Endpoint
///
/// `GET /api/services/{id}/reviews?min_rating=4`
#[utoipa::path(
    get,
    path = "/api/services/{id}/reviews",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Service ID"), ServiceReviewsQuery),
    responses(
        (status = 200, description = "Reviews", body = ListResponse<ReviewResponse>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 404, description = "Service not found", body = ErrorBody)
    )
)]
pub async fn service_reviews_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ServiceReviewsQuery>,
) -> Result<Json<ListResponse<ReviewResponse>>, AppError> {
    query.validate()?;
    let page = query.pagination.to_page_request()?;

    let reviews = state
        .review_service
        .list_for_service(id, query.filter(), page)
        .await?;

    Ok(Json(ListResponse::from_page(reviews, &query.pagination)))
}

/// Rating aggregate of a service.
///
/// # Endpoint
///
/// `GET /api/services/{id}/reviews/stats`
///
/// # Response
///
/// ```json
/// {
///   "service_id": "6f1c2b1e-8a3a-4b5e-9a0e-0a3f1e6f2b11",
///   "review_count": 3,
///   "average_rating": 4.33,
///   "min_rating": 3,
///   "max_rating": 5
/// }
/// ```
#[utoipa::path(
    get,
    path = "/api/services/{id}/reviews/stats",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Rating statistics", body = RatingStatsResponse),
        (status = 404, description = "Service not found", body = ErrorBody)
    )
)]
pub async fn service_rating_stats_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<RatingStatsResponse>, AppError> {
    let stats = state.review_service.stats(id).await?;
    Ok(Json(stats.into()))
}

/// Lists the bookings of one service.
///
/// # Endpoint
///
/// `GET /api/services/{id}/bookings?status=confirmed`
#[utoipa::path(
    get,
    path = "/api/services/{id}/bookings",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Service ID"), ServiceBookingsQuery),
    responses(
        (status = 200, description = "Bookings", body = ListResponse<BookingResponse>),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "Service not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn service_bookings_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(query): ApiQuery<ServiceBookingsQuery>,
) -> Result<Json<ListResponse<BookingResponse>>, AppError> {
    let page = query.pagination.to_page_request()?;
    let bookings = state
        .booking_service
        .list_for_service(&admin, id, query.status, page)
        .await?;

    Ok(Json(ListResponse::from_page(bookings, &query.pagination)))
}

/// Lists services including inactive ones.
///
/// # Endpoint
///
/// `GET /api/admin/services?is_active=false&owner_id=...`
#[utoipa::path(
    get,
    path = "/api/admin/services",
    tag = "Admin",
    params(AdminServiceListQuery),
    responses(
        (status = 200, description = "Services", body = ListResponse<ServiceResponse>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_list_services_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiQuery(query): ApiQuery<AdminServiceListQuery>,
) -> Result<Json<ListResponse<ServiceResponse>>, AppError> {
    let page = query.pagination.to_page_request()?;
    let services = state
        .catalog_service
        .list_admin(&admin, query.filter(), page)
        .await?;

    Ok(Json(ListResponse::from_page(services, &query.pagination)))
}

/// Returns a service regardless of its active flag.
///
/// # Endpoint
///
/// `GET /api/admin/services/{id}`
#[utoipa::path(
    get,
    path = "/api/admin/services/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "Service ID")),
    responses(
        (status = 200, description = "Service", body = ServiceResponse),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "Service not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_get_service_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ServiceResponse>, AppError> {
    let service = state.catalog_service.get_admin(&admin, id).await?;
    Ok(Json(service.into()))
}
