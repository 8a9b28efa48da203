//! Bearer token authentication middleware and the extractors built on it.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_auth::AuthBearer;
use serde_json::json;

use crate::application::services::AuthSession;
use crate::domain::entities::User;
use crate::{error::AppError, state::AppState};

/// Authenticates requests using JWT access tokens from the Authorization header.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <access token>
/// ```
///
/// # Authentication Flow
///
/// 1. Extract token from `Authorization` header
/// 2. Verify signature, expiry and token type
/// 3. Reject tokens whose `jti` is blacklisted
/// 4. Load the account and require it to be active
/// 5. Store the [`AuthSession`] in request extensions
///
/// # Errors
///
/// Returns `401 Unauthorized` if the header is missing or the token is
/// rejected at any step. The response carries `WWW-Authenticate: Bearer`.
///
/// # Example
///
/// ```rust,ignore
/// use axum::{Router, routing::get, middleware};
/// use crate::api::middleware::auth;
///
/// let protected = Router::new()
///     .route("/users/me", get(me_handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer));
/// ```
pub async fn layer(
    State(st): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    let AuthBearer(token) = AuthBearer::from_request_parts(&mut parts, &())
        .await
        .map_err(|_| {
            AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
        })?;

    let session = st.auth_service.authenticate(&token).await?;
    parts.extensions.insert(session);

    let req = Request::from_parts(parts, body);

    Ok(next.run(req).await)
}

fn session_from(parts: &Parts) -> Result<&AuthSession, AppError> {
    parts.extensions.get::<AuthSession>().ok_or_else(|| {
        AppError::unauthorized(
            "Unauthorized",
            json!({"reason": "Authentication required"}),
        )
    })
}

/// The authenticated account. Requires [`layer`] on the route.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from(parts).map(|s| CurrentUser(s.user.clone()))
    }
}

/// The authenticated account, which must have the admin role.
///
/// # Errors
///
/// Returns `401` without a session and `403` for non-admins.
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from(parts)?;

        if !session.user.is_admin() {
            tracing::warn!(
                user_id = %session.user.id,
                path = %parts.uri.path(),
                "Non-admin request to admin endpoint"
            );
            return Err(AppError::forbidden(
                "Admin role required",
                json!({"path": parts.uri.path()}),
            ));
        }

        Ok(AdminUser(session.user.clone()))
    }
}

/// The full session, including the token claims. Used by logout.
impl<S: Send + Sync> FromRequestParts<S> for AuthSession {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        session_from(parts).cloned()
    }
}
