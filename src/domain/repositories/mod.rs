//! Repository trait definitions for the domain layer.
//!
//! This module defines the repository interfaces (traits) that abstract data access
//! operations following the Repository pattern. These traits are implemented by
//! concrete repositories in the infrastructure layer.
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`UserRepository`] - Accounts
//! - [`ServiceRepository`] - Service listings
//! - [`BookingRepository`] - Bookings and slot overlap checks
//! - [`ReviewRepository`] - Reviews and rating aggregates
//! - [`TokenBlacklistRepository`] - Revoked token identifiers
//!
//! # Testing
//!
//! See integration tests in `tests/repository_*.rs` for usage examples.

pub mod booking_repository;
pub mod review_repository;
pub mod service_repository;
pub mod token_blacklist_repository;
pub mod user_repository;

pub use booking_repository::BookingRepository;
pub use review_repository::ReviewRepository;
pub use service_repository::ServiceRepository;
pub use token_blacklist_repository::TokenBlacklistRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use booking_repository::MockBookingRepository;
#[cfg(test)]
pub use review_repository::MockReviewRepository;
#[cfg(test)]
pub use service_repository::MockServiceRepository;
#[cfg(test)]
pub use token_blacklist_repository::MockTokenBlacklistRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
