//! Handlers for reviews.

use axum::{Json, extract::State, http::StatusCode};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::ListResponse;
use crate::api::dto::review::{
    AdminReviewListQuery, CreateReviewRequest, ReviewResponse, UpdateReviewRequest,
};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::middleware::{AdminUser, CurrentUser};
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Reviews a completed booking of the caller.
///
/// # Endpoint
///
/// `POST /api/reviews`
///
/// # Request Body
///
/// ```json
/// {
///   "booking_id": "0b8e5a53-2f7c-4c1e-b1f4-6a4a1c9d7e21",
///   "rating": 5,
///   "comment": "Great session"
/// }
/// ```
///
/// # Errors
///
/// - **403**: Booking belongs to someone else
/// - **404**: Booking not found
/// - **409**: Booking not completed, or already reviewed
#[utoipa::path(
    post,
    path = "/api/reviews",
    tag = "Reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Not your booking", body = ErrorBody),
        (status = 404, description = "Booking not found", body = ErrorBody),
        (status = 409, description = "Booking not completed or already reviewed", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_review_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    payload.validate()?;

    let review = state
        .review_service
        .create(&user, payload.booking_id, payload.rating, payload.comment)
        .await?;

    Ok((StatusCode::CREATED, Json(review.into())))
}

/// Returns one review.
///
/// # Endpoint
///
/// `GET /api/reviews/{id}`
#[utoipa::path(
    get,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review", body = ReviewResponse),
        (status = 404, description = "Review not found", body = ErrorBody)
    )
)]
pub async fn get_review_handler(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let review = state.review_service.get(id).await?;
    Ok(Json(review.into()))
}

/// Changes rating and/or comment. Author or admin.
///
/// # Endpoint
///
/// `PATCH /api/reviews/{id}`
#[utoipa::path(
    patch,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = ReviewResponse),
        (status = 400, description = "Validation error or empty body", body = ErrorBody),
        (status = 403, description = "Not your review", body = ErrorBody),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_review_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    payload.validate()?;

    let review = state
        .review_service
        .update(&user, id, payload.into())
        .await?;

    Ok(Json(review.into()))
}

/// Deletes a review permanently. Author or admin.
///
/// # Endpoint
///
/// `DELETE /api/reviews/{id}`
#[utoipa::path(
    delete,
    path = "/api/reviews/{id}",
    tag = "Reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 403, description = "Not your review", body = ErrorBody),
        (status = 404, description = "Review not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_review_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.review_service.delete(&user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists every review.
///
/// # Endpoint
///
/// `GET /api/admin/reviews?service_id=...&max_rating=2`
#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    tag = "Admin",
    params(AdminReviewListQuery),
    responses(
        (status = 200, description = "Reviews", body = ListResponse<ReviewResponse>),
        (status = 400, description = "Invalid filter", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn admin_list_reviews_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiQuery(query): ApiQuery<AdminReviewListQuery>,
) -> Result<Json<ListResponse<ReviewResponse>>, AppError> {
    query.validate()?;
    let page = query.pagination.to_page_request()?;

    let reviews = state
        .review_service
        .list_all(&admin, query.filter(), page)
        .await?;

    Ok(Json(ListResponse::from_page(reviews, &query.pagination)))
}
