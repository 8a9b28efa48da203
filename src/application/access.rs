//! Authorization checks shared by the application services.

use serde_json::json;
use uuid::Uuid;

use crate::domain::entities::User;
use crate::error::AppError;

/// Rejects callers without the admin role.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] for non-admin users.
pub fn require_admin(actor: &User, action: &str) -> Result<(), AppError> {
    if !actor.is_admin() {
        tracing::warn!(user_id = %actor.id, action, "Non-admin attempted admin action");
        return Err(AppError::forbidden(
            "Admin role required",
            json!({ "action": action }),
        ));
    }
    Ok(())
}

/// Rejects callers that neither own the resource nor are admins.
///
/// # Errors
///
/// Returns [`AppError::Forbidden`] when access is denied.
pub fn require_owner_or_admin(
    actor: &User,
    owner_id: Uuid,
    resource: &str,
    resource_id: Uuid,
) -> Result<(), AppError> {
    if !actor.can_access(owner_id) {
        tracing::warn!(
            user_id = %actor.id,
            role = %actor.role,
            resource,
            %resource_id,
            "Access to foreign resource denied"
        );
        return Err(AppError::forbidden(
            format!("Not allowed to access this {resource}"),
            json!({ "id": resource_id }),
        ));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;
    use uuid::Uuid;

    use crate::domain::entities::{Role, User};

    pub fn user_with_role(role: Role) -> User {
        User {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", Uuid::new_v4().simple()),
            name: "Test User".to_string(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
            role,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn member() -> User {
        user_with_role(Role::User)
    }

    pub fn admin() -> User {
        user_with_role(Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{admin, member};
    use super::*;

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&admin(), "delete service").is_ok());
        assert!(matches!(
            require_admin(&member(), "delete service"),
            Err(AppError::Forbidden { .. })
        ));
    }

    #[test]
    fn test_owner_or_admin() {
        let owner = member();
        let stranger = member();

        assert!(require_owner_or_admin(&owner, owner.id, "booking", Uuid::new_v4()).is_ok());
        assert!(require_owner_or_admin(&admin(), owner.id, "booking", Uuid::new_v4()).is_ok());
        assert!(matches!(
            require_owner_or_admin(&stranger, owner.id, "booking", Uuid::new_v4()),
            Err(AppError::Forbidden { .. })
        ));
    }
}
