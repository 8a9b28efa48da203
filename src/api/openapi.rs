//! OpenAPI document served at `/api-docs/openapi.json` and rendered at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::dto::auth::{
    LoginRequest, LogoutRequest, MessageResponse, RefreshRequest, RegisterRequest, TokenForm,
    TokenResponse,
};
use crate::api::dto::booking::{
    BookingResponse, CreateBookingRequest, SetStatusRequest, UpdateBookingRequest,
};
use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse, WelcomeResponse};
use crate::api::dto::review::{
    CreateReviewRequest, RatingStatsResponse, ReviewResponse, UpdateReviewRequest,
};
use crate::api::dto::service::{CreateServiceRequest, ServiceResponse, UpdateServiceRequest};
use crate::api::dto::user::{AdminUpdateUserRequest, UpdateMeRequest, UserResponse};
use crate::api::handlers::{auth, bookings, health, reviews, services, users};
use crate::domain::entities::{BookingStatus, Role};
use crate::error::{ErrorBody, ErrorInfo};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "BookIT API",
        description = "Booking platform: accounts, service catalog, bookings and reviews.",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    tags(
        (name = "Health", description = "Liveness and welcome endpoints"),
        (name = "Authentication", description = "Registration, login and token lifecycle"),
        (name = "Users", description = "The caller's own account"),
        (name = "Services", description = "Service catalog"),
        (name = "Bookings", description = "Booking lifecycle"),
        (name = "Reviews", description = "Reviews of completed bookings"),
        (name = "Admin", description = "Admin-only endpoints")
    ),
    paths(
        health::root_handler,
        health::health_handler,
        auth::register_handler,
        auth::login_handler,
        auth::token_handler,
        auth::refresh_handler,
        auth::logout_handler,
        users::me_handler,
        users::update_me_handler,
        users::my_reviews_handler,
        users::list_users_handler,
        users::get_user_handler,
        users::update_user_handler,
        users::delete_user_handler,
        users::user_reviews_handler,
        services::list_services_handler,
        services::get_service_handler,
        services::create_service_handler,
        services::update_service_handler,
        services::delete_service_handler,
        services::service_reviews_handler,
        services::service_rating_stats_handler,
        services::service_bookings_handler,
        services::admin_list_services_handler,
        services::admin_get_service_handler,
        bookings::create_booking_handler,
        bookings::list_bookings_handler,
        bookings::get_booking_handler,
        bookings::update_booking_handler,
        bookings::cancel_booking_handler,
        bookings::booking_review_handler,
        bookings::admin_list_bookings_handler,
        bookings::set_booking_status_handler,
        reviews::create_review_handler,
        reviews::get_review_handler,
        reviews::update_review_handler,
        reviews::delete_review_handler,
        reviews::admin_list_reviews_handler
    ),
    components(
        schemas(
            RegisterRequest,
            LoginRequest,
            TokenForm,
            RefreshRequest,
            LogoutRequest,
            TokenResponse,
            MessageResponse,
            UserResponse,
            UpdateMeRequest,
            AdminUpdateUserRequest,
            Role,
            ServiceResponse,
            CreateServiceRequest,
            UpdateServiceRequest,
            BookingResponse,
            BookingStatus,
            CreateBookingRequest,
            UpdateBookingRequest,
            SetStatusRequest,
            ReviewResponse,
            CreateReviewRequest,
            UpdateReviewRequest,
            RatingStatsResponse,
            HealthResponse,
            HealthChecks,
            CheckStatus,
            WelcomeResponse,
            ErrorBody,
            ErrorInfo
        )
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Access token from /api/auth/login or /api/auth/token",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_protected_and_public_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        assert!(paths.contains_key("/api/auth/login"));
        assert!(paths.contains_key("/api/bookings/{id}"));
        assert!(paths.contains_key("/api/admin/bookings/{id}/status"));
        assert!(paths.contains_key("/health"));
    }

    #[test]
    fn test_list_endpoints_document_filters() {
        let doc = ApiDoc::openapi();
        let list = doc.paths.paths["/api/bookings"]
            .get
            .as_ref()
            .expect("GET /api/bookings");
        let names: Vec<&str> = list
            .parameters
            .iter()
            .flatten()
            .map(|p| p.name.as_str())
            .collect();

        assert!(names.contains(&"status"));
        assert!(names.contains(&"service_id"));
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
