//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`                      - Welcome message (public)
//! - `GET  /health`                - Health check: database (public)
//! - `GET  /docs`                  - Swagger UI
//! - `GET  /api-docs/openapi.json` - OpenAPI document
//! - `/api/*`                      - REST API
//!
//! # Middleware
//!
//! - **Request id** - `x-request-id` set when absent and echoed back
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Permissive, the API is public
//! - **Rate limiting** - Per-IP token bucket, stricter on `/api/auth/*`
//! - **Authentication** - Bearer token on protected routes
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, root_handler};
use crate::api::middleware::{auth, rate_limit, tracing};
use crate::api::openapi::ApiDoc;
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

fn build(state: AppState, limits: Option<bool>) -> Router {
    let mut auth_routes = api::routes::auth_routes();

    let mut api_routes = api::routes::public_routes().merge(
        api::routes::protected_routes()
            .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer)),
    );

    if let Some(behind_proxy) = limits {
        if let Some(limit) = rate_limit::secure_layer(behind_proxy) {
            auth_routes = auth_routes.layer(limit);
        }
        if let Some(limit) = rate_limit::layer(behind_proxy) {
            api_routes = api_routes.layer(limit);
        }
    }

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .nest("/api", auth_routes.merge(api_routes))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

/// All routes with authentication, without rate limiting or outer layers.
///
/// Used by integration tests, which have no peer address to key limits on.
pub fn api_router(state: AppState) -> Router {
    build(state, None)
}

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `behind_proxy` - when `true`, rate limiting reads client IP from
///   `X-Forwarded-For` / `X-Real-IP` headers instead of the peer socket address;
///   enable only when the service runs behind a trusted reverse proxy
pub fn app_router(state: AppState, behind_proxy: bool) -> NormalizePath<Router> {
    let router = build(state, Some(behind_proxy))
        .layer(CorsLayer::permissive())
        .layer(tracing::propagate_request_id_layer())
        .layer(tracing::layer())
        .layer(tracing::request_id_layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
