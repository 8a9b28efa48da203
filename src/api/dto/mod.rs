//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization, validator
//! for input validation and utoipa for the generated OpenAPI schemas.

pub mod auth;
pub mod booking;
pub mod health;
pub mod pagination;
pub mod review;
pub mod service;
pub mod user;
