//! Repository trait for revoked tokens.

use crate::domain::entities::NewBlacklistedToken;
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for the token blacklist.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenBlacklistRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_token_blacklist.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenBlacklistRepository: Send + Sync {
    /// Records a revoked token. Adding the same `jti` twice is a no-op.
    ///
    /// # Returns
    ///
    /// `true` if this call inserted the entry, `false` if it was already there.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn add(&self, token: NewBlacklistedToken) -> Result<bool, AppError>;

    /// Returns true if the `jti` has been revoked.
    async fn is_blacklisted(&self, jti: Uuid) -> Result<bool, AppError>;

    /// Deletes entries whose `expires_at` has passed.
    ///
    /// # Returns
    ///
    /// Number of deleted rows.
    async fn delete_expired(&self) -> Result<u64, AppError>;
}
