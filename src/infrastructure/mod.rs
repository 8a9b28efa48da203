//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer and provides
//! the credential primitives the services rely on.
//!
//! # Modules
//!
//! - [`persistence`] - PostgreSQL repository implementations
//! - [`security`] - Password hashing and JWT encoding

pub mod persistence;
pub mod security;
