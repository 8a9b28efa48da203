//! PostgreSQL repository implementations.
//!
//! Concrete implementations of the domain repository traits using SQLx.
//! Queries are checked at runtime and rows are mapped through private
//! `FromRow` structs, so building the crate needs no live database.
//!
//! # Repositories
//!
//! - [`PgUserRepository`] - Accounts
//! - [`PgServiceRepository`] - Service catalog
//! - [`PgBookingRepository`] - Bookings with locked overlap checks
//! - [`PgReviewRepository`] - Reviews and rating aggregates
//! - [`PgTokenBlacklistRepository`] - Revoked token identifiers

pub mod pg_booking_repository;
pub mod pg_review_repository;
pub mod pg_service_repository;
pub mod pg_token_blacklist_repository;
pub mod pg_user_repository;

pub use pg_booking_repository::PgBookingRepository;
pub use pg_review_repository::PgReviewRepository;
pub use pg_service_repository::PgServiceRepository;
pub use pg_token_blacklist_repository::PgTokenBlacklistRepository;
pub use pg_user_repository::PgUserRepository;
