//! PostgreSQL implementation of the token blacklist.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::NewBlacklistedToken;
use crate::domain::repositories::TokenBlacklistRepository;
use crate::error::AppError;

/// PostgreSQL repository for revoked token identifiers.
///
/// Only the `jti` is stored, never the token itself.
pub struct PgTokenBlacklistRepository {
    pool: Arc<PgPool>,
}

impl PgTokenBlacklistRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenBlacklistRepository for PgTokenBlacklistRepository {
    async fn add(&self, token: NewBlacklistedToken) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO token_blacklist (jti, token_type, user_id, expires_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (jti) DO NOTHING
            "#,
        )
        .bind(token.jti)
        .bind(token.token_kind.as_str())
        .bind(token.user_id)
        .bind(token.expires_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn is_blacklisted(&self, jti: Uuid) -> Result<bool, AppError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM token_blacklist WHERE jti = $1)")
                .bind(jti)
                .fetch_one(self.pool.as_ref())
                .await?;

        Ok(exists)
    }

    async fn delete_expired(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at <= NOW()")
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected())
    }
}
