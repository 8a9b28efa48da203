//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Registration, login, token lifecycle
//! - [`services::user_service::UserService`] - Profiles and account administration
//! - [`services::catalog_service::CatalogService`] - Service listings
//! - [`services::booking_service::BookingService`] - Bookings and status transitions
//! - [`services::review_service::ReviewService`] - Reviews and rating statistics
//!
//! Role and ownership checks live in [`access`].

pub mod access;
pub mod services;
