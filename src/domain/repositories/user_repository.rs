//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, PageRequest, Paginated, User, UserFilter, UserPatch};
use crate::error::AppError;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository interface for user accounts.
///
/// Emails are stored lowercase; callers normalize before lookups.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn create(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds an account by ID, active or not.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    /// Finds an account by its (lowercase) email, active or not.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Lists accounts newest first.
    async fn list(&self, filter: UserFilter, page: PageRequest)
    -> Result<Paginated<User>, AppError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    /// Returns [`AppError::Conflict`] if the new email is already taken.
    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError>;
}
