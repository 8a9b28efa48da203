//! API route configuration.
//!
//! Routes are split by how they are guarded. [`protected_routes`] must be
//! wrapped in [`crate::api::middleware::auth::layer`]; admin-only handlers
//! additionally reject non-admins through the [`AdminUser`] extractor.
//!
//! [`AdminUser`]: crate::api::middleware::AdminUser

use crate::api::handlers::*;
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Credential endpoints. Public, but rate limited more strictly.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account
/// - `POST /auth/login`    - JSON login
/// - `POST /auth/token`    - Form login for the docs UI
/// - `POST /auth/refresh`  - Rotate a refresh token
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/token", post(token_handler))
        .route("/auth/refresh", post(refresh_handler))
}

/// Read-only catalog and review endpoints open to anonymous clients.
///
/// # Endpoints
///
/// - `GET /services`                    - Active services
/// - `GET /services/{id}`               - One active service
/// - `GET /services/{id}/reviews`       - Reviews of a service
/// - `GET /services/{id}/reviews/stats` - Rating aggregate
/// - `GET /reviews/{id}`                - One review
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(list_services_handler))
        .route("/services/{id}", get(get_service_handler))
        .route("/services/{id}/reviews", get(service_reviews_handler))
        .route(
            "/services/{id}/reviews/stats",
            get(service_rating_stats_handler),
        )
        .route("/reviews/{id}", get(get_review_handler))
}

/// Endpoints requiring a valid access token.
///
/// # Endpoints
///
/// - `POST   /auth/logout`                  - Revoke tokens
/// - `GET    /users/me`, `PATCH`            - Own profile
/// - `GET    /users/me/reviews`             - Own reviews
/// - `GET    /users`                        - Accounts (admin)
/// - `GET    /users/{id}`, `PATCH`, `DELETE` - Manage an account (admin)
/// - `POST   /services`                     - Create a service (admin)
/// - `PATCH  /services/{id}`, `DELETE`      - Manage a service (admin)
/// - `GET    /services/{id}/bookings`       - Bookings of a service (admin)
/// - `POST   /bookings`, `GET`              - Book, list own bookings
/// - `GET    /bookings/{id}`, `PATCH`, `DELETE` - Manage a booking (owner or admin)
/// - `GET    /bookings/{id}/review`         - Review of a booking
/// - `POST   /reviews`                      - Review a completed booking
/// - `PATCH  /reviews/{id}`, `DELETE`       - Manage a review (author or admin)
/// - `GET    /admin/...`                    - Admin listings
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout_handler))
        .route("/users/me", get(me_handler).patch(update_me_handler))
        .route("/users/me/reviews", get(my_reviews_handler))
        .route("/users", get(list_users_handler))
        .route(
            "/users/{id}",
            get(get_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/services", post(create_service_handler))
        .route(
            "/services/{id}",
            patch(update_service_handler).delete(delete_service_handler),
        )
        .route("/services/{id}/bookings", get(service_bookings_handler))
        .route(
            "/bookings",
            post(create_booking_handler).get(list_bookings_handler),
        )
        .route(
            "/bookings/{id}",
            get(get_booking_handler)
                .patch(update_booking_handler)
                .delete(cancel_booking_handler),
        )
        .route("/bookings/{id}/review", get(booking_review_handler))
        .route("/reviews", post(create_review_handler))
        .route(
            "/reviews/{id}",
            patch(update_review_handler).delete(delete_review_handler),
        )
        .merge(admin_routes())
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/services", get(admin_list_services_handler))
        .route("/admin/services/{id}", get(admin_get_service_handler))
        .route("/admin/bookings", get(admin_list_bookings_handler))
        .route(
            "/admin/bookings/{id}/status",
            patch(set_booking_status_handler),
        )
        .route("/admin/reviews", get(admin_list_reviews_handler))
        .route("/admin/users/{id}/reviews", get(user_reviews_handler))
}
