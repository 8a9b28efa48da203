//! Handlers for the caller's profile and admin account management.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::{ListResponse, PaginationParams};
use crate::api::dto::review::ReviewResponse;
use crate::api::dto::user::{AdminUpdateUserRequest, UpdateMeRequest, UserListQuery, UserResponse};
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::api::middleware::{AdminUser, CurrentUser};
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

fn empty_update() -> AppError {
    AppError::bad_request(
        "No fields to update",
        json!({"reason": "Provide at least one field"}),
    )
}

/// Returns the authenticated account.
///
/// # Endpoint
///
/// `GET /api/users/me`
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn me_handler(CurrentUser(user): CurrentUser) -> Json<UserResponse> {
    Json(user.into())
}

/// Updates the caller's name, email or password.
///
/// # Endpoint
///
/// `PATCH /api/users/me`
///
/// # Errors
///
/// - **400**: Empty body or validation failure
/// - **409**: Email taken by another account
#[utoipa::path(
    patch,
    path = "/api/users/me",
    tag = "Users",
    request_body = UpdateMeRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_me_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiJson(payload): ApiJson<UpdateMeRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;
    if payload.is_empty() {
        return Err(empty_update());
    }

    let updated = state
        .user_service
        .update_profile(&user, payload.into())
        .await?;

    Ok(Json(updated.into()))
}

/// Lists reviews written by the caller, newest first.
///
/// # Endpoint
///
/// `GET /api/users/me/reviews?page=1&page_size=25`
#[utoipa::path(
    get,
    path = "/api/users/me/reviews",
    tag = "Users",
    params(PaginationParams),
    responses(
        (status = 200, description = "Caller's reviews", body = ListResponse<ReviewResponse>),
        (status = 400, description = "Invalid pagination", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_reviews_handler(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<ReviewResponse>>, AppError> {
    let page = params.to_page_request()?;
    let reviews = state.review_service.list_mine(&user, page).await?;

    Ok(Json(ListResponse::from_page(reviews, &params)))
}

/// Lists accounts, including deactivated ones.
///
/// # Endpoint
///
/// `GET /api/users?role=admin&is_active=true&q=jane&page=1`
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Admin",
    params(UserListQuery),
    responses(
        (status = 200, description = "Accounts", body = ListResponse<UserResponse>),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_users_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiQuery(query): ApiQuery<UserListQuery>,
) -> Result<Json<ListResponse<UserResponse>>, AppError> {
    let page = query.pagination.to_page_request()?;
    let users = state
        .user_service
        .list_users(&admin, query.filter(), page)
        .await?;

    Ok(Json(ListResponse::from_page(users, &query.pagination)))
}

/// Returns any account by id.
///
/// # Endpoint
///
/// `GET /api/users/{id}`
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Account", body = UserResponse),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.get_user_as_admin(&admin, id).await?;
    Ok(Json(user.into()))
}

/// Updates name, email, role or active flag of any account.
///
/// # Endpoint
///
/// `PATCH /api/users/{id}`
///
/// # Errors
///
/// - **400**: Empty body or validation failure
/// - **404**: Unknown user
/// - **409**: Email taken, or an admin demoting or deactivating themself
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AdminUpdateUserRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 409, description = "Conflict", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_user_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<AdminUpdateUserRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;
    if payload.is_empty() {
        return Err(empty_update());
    }

    let user = state
        .user_service
        .update_user(&admin, id, payload.into())
        .await?;

    Ok(Json(user.into()))
}

/// Deactivates an account. The row is kept.
///
/// # Endpoint
///
/// `DELETE /api/users/{id}`
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "Account deactivated"),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
        (status = 409, description = "Cannot deactivate yourself", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_user_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.user_service.deactivate_user(&admin, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Lists reviews written by one account.
///
/// # Endpoint
///
/// `GET /api/admin/users/{id}/reviews`
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}/reviews",
    tag = "Admin",
    params(("id" = Uuid, Path, description = "User ID"), PaginationParams),
    responses(
        (status = 200, description = "User's reviews", body = ListResponse<ReviewResponse>),
        (status = 403, description = "Admin role required", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn user_reviews_handler(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<ListResponse<ReviewResponse>>, AppError> {
    let page = params.to_page_request()?;
    let user = state.user_service.get_user_as_admin(&admin, id).await?;
    let reviews = state
        .review_service
        .list_for_user(&admin, user.id, page)
        .await?;

    Ok(Json(ListResponse::from_page(reviews, &params)))
}
