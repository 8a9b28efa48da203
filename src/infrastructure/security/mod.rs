//! Credential primitives: password hashing and signed tokens.

pub mod jwt;
pub mod password;

pub use jwt::{Claims, IssuedToken, JwtCodec, TokenError};
pub use password::{PasswordError, hash_password, verify_password};
