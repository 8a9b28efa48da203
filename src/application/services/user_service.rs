//! Profile and account administration service.

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::access::require_admin;
use crate::application::services::auth_service::normalize_email;
use crate::domain::entities::{PageRequest, Paginated, Role, User, UserFilter, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use crate::infrastructure::security::hash_password;

/// Self-service profile changes. The password is plaintext here and hashed
/// by the service.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Changes an administrator may apply to any account.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the account does not exist.
    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found", json!({"id": id})))
    }

    /// Fails with a conflict if another account already uses `email`.
    async fn ensure_email_free(&self, email: &str, owner: Uuid) -> Result<(), AppError> {
        if let Some(other) = self.repository.find_by_email(email).await?
            && other.id != owner
        {
            return Err(AppError::conflict(
                "Email already registered",
                json!({"email": email}),
            ));
        }
        Ok(())
    }

    /// Updates the caller's own profile.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new email is taken.
    #[tracing::instrument(skip(self, actor, update), fields(user_id = %actor.id))]
    pub async fn update_profile(
        &self,
        actor: &User,
        update: ProfileUpdate,
    ) -> Result<User, AppError> {
        let email = update.email.as_deref().map(normalize_email);
        if let Some(ref email) = email {
            self.ensure_email_free(email, actor.id).await?;
        }

        let password_hash = match update.password {
            Some(ref password) => Some(hash_password(password)?),
            None => None,
        };

        let patch = UserPatch {
            email,
            name: update.name,
            password_hash,
            role: None,
            is_active: None,
        };

        self.repository.update(actor.id, patch).await
    }

    /// Lists accounts. Admin only.
    pub async fn list_users(
        &self,
        actor: &User,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>, AppError> {
        require_admin(actor, "list users")?;
        self.repository.list(filter, page).await
    }

    /// Reads any account. Admin only.
    pub async fn get_user_as_admin(&self, actor: &User, id: Uuid) -> Result<User, AppError> {
        require_admin(actor, "view user")?;
        self.get_user(id).await
    }

    /// Updates any account, including role and active flag. Admin only.
    ///
    /// Admins cannot demote or deactivate themselves, which would otherwise
    /// allow locking the last administrator out.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Forbidden`] for non-admins.
    /// Returns [`AppError::NotFound`] if the account does not exist.
    /// Returns [`AppError::Conflict`] for self-demotion, self-deactivation or a taken email.
    #[tracing::instrument(skip(self, actor, update), fields(actor_id = %actor.id))]
    pub async fn update_user(
        &self,
        actor: &User,
        id: Uuid,
        update: AccountUpdate,
    ) -> Result<User, AppError> {
        require_admin(actor, "update user")?;

        if actor.id == id {
            if update.role.is_some_and(|r| r != Role::Admin) {
                return Err(AppError::conflict(
                    "Administrators cannot demote themselves",
                    json!({"id": id}),
                ));
            }
            if update.is_active == Some(false) {
                return Err(AppError::conflict(
                    "Administrators cannot deactivate themselves",
                    json!({"id": id}),
                ));
            }
        }

        self.get_user(id).await?;

        let email = update.email.as_deref().map(normalize_email);
        if let Some(ref email) = email {
            self.ensure_email_free(email, id).await?;
        }

        let patch = UserPatch {
            email,
            name: update.name,
            password_hash: None,
            role: update.role,
            is_active: update.is_active,
        };

        let user = self.repository.update(id, patch).await?;
        tracing::info!(user_id = %user.id, role = %user.role, is_active = user.is_active, "Account updated");
        Ok(user)
    }

    /// Soft-deletes an account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when an admin targets their own account.
    /// Returns [`AppError::NotFound`] if the account does not exist.
    pub async fn deactivate_user(&self, actor: &User, id: Uuid) -> Result<(), AppError> {
        self.update_user(
            actor,
            id,
            AccountUpdate {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
        .map(|_| ())
    }
}
