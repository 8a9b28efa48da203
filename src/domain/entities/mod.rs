//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures. The only behaviour they carry is the
//! rules that belong to the data itself, such as which booking status may
//! follow which.
//!
//! # Entity Types
//!
//! - [`User`] - An account with a [`Role`]
//! - [`Service`] - A bookable offering
//! - [`Booking`] - A reservation with a [`BookingStatus`]
//! - [`Review`] - Feedback on a completed booking
//! - [`BlacklistedToken`] - A revoked token identifier
//!
//! # Design Pattern
//!
//! Creation and updates use dedicated structs:
//! - `NewUser`, `NewService`, `NewBooking`, `NewReview` - For creating new records
//! - `UserPatch`, `ServicePatch`, `BookingPatch`, `ReviewPatch` - For partial updates
//! - `*Filter` - For listing queries

pub mod blacklisted_token;
pub mod booking;
pub mod page;
pub mod review;
pub mod service;
pub mod user;

pub use blacklisted_token::{BlacklistedToken, NewBlacklistedToken, TokenKind};
pub use booking::{Booking, BookingFilter, BookingPatch, BookingStatus, NewBooking};
pub use page::{PageRequest, Paginated};
pub use review::{NewReview, RatingStats, Review, ReviewFilter, ReviewPatch};
pub use service::{NewService, Service, ServiceFilter, ServicePatch};
pub use user::{NewUser, Role, User, UserFilter, UserPatch};
