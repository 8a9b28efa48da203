//! PostgreSQL implementation of the user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{NewUser, PageRequest, Paginated, User, UserFilter, UserPatch};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const COLUMNS: &str = "id, email, name, password_hash, role, is_active, created_at, updated_at";

const FILTER: &str = r#"
    WHERE ($1::TEXT IS NULL OR role = $1)
      AND ($2::BOOLEAN IS NULL OR is_active = $2)
      AND ($3::TEXT IS NULL OR email ILIKE '%' || $3 || '%' OR name ILIKE '%' || $3 || '%')
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    name: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        let role = r.role.parse().map_err(|e: String| {
            AppError::internal("Corrupt user row", json!({"id": r.id, "reason": e}))
        })?;

        Ok(User {
            id: r.id,
            email: r.email,
            name: r.name,
            password_hash: r.password_hash,
            role,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// PostgreSQL repository for accounts.
pub struct PgUserRepository {
    pool: Arc<PgPool>,
}

impl PgUserRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (email, name, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new_user.email)
        .bind(&new_user.name)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(self.pool.as_ref())
        .await?;

        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(self.pool.as_ref())
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let row =
            sqlx::query_as::<_, UserRow>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(self.pool.as_ref())
                .await?;

        row.map(User::try_from).transpose()
    }

    async fn list(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Paginated<User>, AppError> {
        let role = filter.role.map(|r| r.as_str());

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {COLUMNS} FROM users {FILTER} ORDER BY created_at DESC, id LIMIT $4 OFFSET $5"
        ))
        .bind(role)
        .bind(filter.is_active)
        .bind(filter.q.as_deref())
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM users {FILTER}"))
            .bind(role)
            .bind(filter.is_active)
            .bind(filter.q.as_deref())
            .fetch_one(self.pool.as_ref())
            .await?;

        let items = rows
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(items, total))
    }

    async fn update(&self, id: Uuid, patch: UserPatch) -> Result<User, AppError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                email         = COALESCE($2, email),
                name          = COALESCE($3, name),
                password_hash = COALESCE($4, password_hash),
                role          = COALESCE($5, role),
                is_active     = COALESCE($6, is_active),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.email)
        .bind(patch.name)
        .bind(patch.password_hash)
        .bind(patch.role.map(|r| r.as_str()))
        .bind(patch.is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.ok_or_else(|| AppError::not_found("User not found", json!({"id": id})))?
            .try_into()
    }
}
