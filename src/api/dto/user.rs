//! DTOs for account endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::api::dto::pagination::PaginationParams;
use crate::application::services::{AccountUpdate, ProfileUpdate};
use crate::domain::entities::{Role, User, UserFilter};

/// Public view of an account. The password hash never leaves the server.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            email: u.email,
            name: u.name,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Request body for `PATCH /api/users/me`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateMeRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: Option<String>,
}

impl UpdateMeRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password.is_none()
    }
}

impl From<UpdateMeRequest> for ProfileUpdate {
    fn from(r: UpdateMeRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            password: r.password,
        }
    }
}

/// Request body for `PATCH /api/users/{id}`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminUpdateUserRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    pub role: Option<Role>,

    pub is_active: Option<bool>,
}

impl AdminUpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.role.is_none() && self.is_active.is_none()
    }
}

impl From<AdminUpdateUserRequest> for AccountUpdate {
    fn from(r: AdminUpdateUserRequest) -> Self {
        Self {
            name: r.name,
            email: r.email,
            role: r.role,
            is_active: r.is_active,
        }
    }
}

/// Query parameters for `GET /api/users`.
#[serde_as]
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub role: Option<Role>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub is_active: Option<bool>,

    /// Case-insensitive match on email or name.
    pub q: Option<String>,

    #[serde(flatten)]
    pub pagination: PaginationParams,
}

impl UserListQuery {
    pub fn filter(&self) -> UserFilter {
        UserFilter {
            role: self.role,
            is_active: self.is_active,
            q: self.q.clone().filter(|q| !q.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_me_empty() {
        let req: UpdateMeRequest = serde_json::from_str("{}").unwrap();
        assert!(req.is_empty());
    }

    #[test]
    fn test_update_me_short_password() {
        let req = UpdateMeRequest {
            name: None,
            email: None,
            password: Some("short".into()),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_admin_update_parses_role() {
        let req: AdminUpdateUserRequest =
            serde_json::from_str(r#"{"role": "admin", "is_active": false}"#).unwrap();
        assert_eq!(req.role, Some(Role::Admin));
        assert_eq!(req.is_active, Some(false));
    }

    #[test]
    fn test_user_query_from_strings() {
        let q: UserListQuery =
            serde_json::from_str(r#"{"role": "user", "is_active": "true", "page": "2"}"#).unwrap();
        let filter = q.filter();
        assert_eq!(filter.role, Some(Role::User));
        assert_eq!(filter.is_active, Some(true));
        assert_eq!(q.pagination.page(), 2);
    }

    #[test]
    fn test_response_hides_password_hash() {
        let json = serde_json::to_value(UserResponse {
            id: Uuid::new_v4(),
            email: "a@b.co".into(),
            name: "A".into(),
            role: Role::User,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
        .unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "user");
    }
}
