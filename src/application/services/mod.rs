//! Business logic services for the application layer.

pub mod auth_service;
pub mod booking_service;
pub mod catalog_service;
pub mod review_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthSession, TokenPair};
pub use booking_service::BookingService;
pub use catalog_service::CatalogService;
pub use review_service::ReviewService;
pub use user_service::{AccountUpdate, ProfileUpdate, UserService};
