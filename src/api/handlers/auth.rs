//! Handlers for registration, login and the token lifecycle.

use axum::{Json, body::Bytes, extract::State, http::StatusCode};
use serde_json::json;
use validator::Validate;

use crate::api::dto::auth::{
    LoginRequest, LogoutRequest, MessageResponse, RefreshRequest, RegisterRequest, TokenForm,
    TokenResponse,
};
use crate::api::dto::user::UserResponse;
use crate::api::extract::{ApiForm, ApiJson};
use crate::application::services::AuthSession;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

/// Creates a new account with the `user` role.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Request Body
///
/// ```json
/// {
///   "name": "Jane Doe",
///   "email": "jane@example.com",
///   "password": "correct-horse-battery"
/// }
/// ```
///
/// # Errors
///
/// - **400**: Validation failed
/// - **409**: An active account already uses this email
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    )
)]
pub async fn register_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(payload.name, payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchanges email and password for an access/refresh token pair.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Errors
///
/// - **401**: Unknown email, wrong password or deactivated account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn login_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let pair = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    Ok(Json(TokenResponse::new(
        pair,
        state.auth_service.access_ttl_seconds(),
    )))
}

/// OAuth2 password grant used by the "Authorize" button of the docs UI.
///
/// # Endpoint
///
/// `POST /api/auth/token` (`application/x-www-form-urlencoded`)
#[utoipa::path(
    post,
    path = "/api/auth/token",
    tag = "Authentication",
    request_body(content = TokenForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody)
    )
)]
pub async fn token_handler(
    State(state): State<AppState>,
    ApiForm(form): ApiForm<TokenForm>,
) -> Result<Json<TokenResponse>, AppError> {
    form.validate()?;

    let pair = state
        .auth_service
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(TokenResponse::new(
        pair,
        state.auth_service.access_ttl_seconds(),
    )))
}

/// Rotates a refresh token: the presented token is revoked and a new pair
/// is issued.
///
/// # Endpoint
///
/// `POST /api/auth/refresh`
///
/// # Errors
///
/// - **401**: Token expired, revoked, malformed or not a refresh token
#[utoipa::path(
    post,
    path = "/api/auth/refresh",
    tag = "Authentication",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New token pair", body = TokenResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorBody)
    )
)]
pub async fn refresh_handler(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let pair = state.auth_service.refresh(&payload.refresh_token).await?;

    Ok(Json(TokenResponse::new(
        pair,
        state.auth_service.access_ttl_seconds(),
    )))
}

/// Revokes the presented access token and, optionally, a refresh token.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// The body is optional. When present it may carry the refresh token of
/// the same account:
///
/// ```json
/// { "refresh_token": "eyJ..." }
/// ```
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Authentication",
    request_body(content = LogoutRequest, description = "Optional refresh token to revoke as well"),
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody)
    ),
    security(("bearer_auth" = []))
)]
pub async fn logout_handler(
    State(state): State<AppState>,
    session: AuthSession,
    body: Bytes,
) -> Result<Json<MessageResponse>, AppError> {
    let payload = parse_logout_body(&body)?;

    state
        .auth_service
        .logout(&session, payload.refresh_token.as_deref())
        .await?;

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

fn parse_logout_body(body: &[u8]) -> Result<LogoutRequest, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(LogoutRequest::default());
    }

    serde_json::from_slice(body).map_err(|e| {
        AppError::bad_request("Invalid JSON body", json!({"reason": e.to_string()}))
    })
}
