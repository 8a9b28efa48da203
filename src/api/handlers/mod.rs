//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod auth;
pub mod bookings;
pub mod health;
pub mod reviews;
pub mod services;
pub mod users;

pub use auth::{login_handler, logout_handler, refresh_handler, register_handler, token_handler};
pub use bookings::{
    admin_list_bookings_handler, booking_review_handler, cancel_booking_handler,
    create_booking_handler, get_booking_handler, list_bookings_handler,
    set_booking_status_handler, update_booking_handler,
};
pub use health::{health_handler, root_handler};
pub use reviews::{
    admin_list_reviews_handler, create_review_handler, delete_review_handler,
    get_review_handler, update_review_handler,
};
pub use services::{
    admin_get_service_handler, admin_list_services_handler, create_service_handler,
    delete_service_handler, get_service_handler, list_services_handler,
    service_bookings_handler, service_rating_stats_handler, service_reviews_handler,
    update_service_handler,
};
pub use users::{
    delete_user_handler, get_user_handler, list_users_handler, me_handler, my_reviews_handler,
    update_me_handler, update_user_handler, user_reviews_handler,
};
