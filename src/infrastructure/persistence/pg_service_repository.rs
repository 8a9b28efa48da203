//! PostgreSQL implementation of the service repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{
    NewService, PageRequest, Paginated, Service, ServiceFilter, ServicePatch,
};
use crate::domain::repositories::ServiceRepository;
use crate::error::AppError;

// Prices are NUMERIC(10,2) in the table and f64 in the entity.
const COLUMNS: &str = "id, name, description, category, price::FLOAT8 AS price, \
                       duration_minutes, is_active, owner_id, created_at, updated_at";

const FILTER: &str = r#"
    WHERE ($1::TEXT IS NULL OR name ILIKE '%' || $1 || '%' OR description ILIKE '%' || $1 || '%')
      AND ($2::TEXT IS NULL OR LOWER(category) = LOWER($2))
      AND ($3::FLOAT8 IS NULL OR price >= $3)
      AND ($4::FLOAT8 IS NULL OR price <= $4)
      AND ($5::BOOLEAN IS NULL OR is_active = $5)
      AND ($6::UUID IS NULL OR owner_id = $6)
"#;

#[derive(sqlx::FromRow)]
struct ServiceRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    category: Option<String>,
    price: f64,
    duration_minutes: i32,
    is_active: bool,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ServiceRow> for Service {
    fn from(r: ServiceRow) -> Self {
        Service {
            id: r.id,
            name: r.name,
            description: r.description,
            category: r.category,
            price: r.price,
            duration_minutes: r.duration_minutes,
            is_active: r.is_active,
            owner_id: r.owner_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// PostgreSQL repository for bookable services.
///
/// Uses soft delete: `is_active = FALSE` hides a service from the public catalog.
pub struct PgServiceRepository {
    pool: Arc<PgPool>,
}

impl PgServiceRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ServiceRepository for PgServiceRepository {
    async fn create(&self, new_service: NewService) -> Result<Service, AppError> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            r#"
            INSERT INTO services (name, description, category, price, duration_minutes, owner_id)
            VALUES ($1, $2, $3, $4::FLOAT8::NUMERIC(10, 2), $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&new_service.name)
        .bind(&new_service.description)
        .bind(&new_service.category)
        .bind(new_service.price)
        .bind(new_service.duration_minutes)
        .bind(new_service.owner_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Service>, AppError> {
        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {COLUMNS} FROM services WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Service::from))
    }

    async fn list(
        &self,
        filter: ServiceFilter,
        page: PageRequest,
    ) -> Result<Paginated<Service>, AppError> {
        let rows = sqlx::query_as::<_, ServiceRow>(&format!(
            "SELECT {COLUMNS} FROM services {FILTER} ORDER BY created_at DESC, id LIMIT $7 OFFSET $8"
        ))
        .bind(filter.q.as_deref())
        .bind(filter.category.as_deref())
        .bind(filter.price_min)
        .bind(filter.price_max)
        .bind(filter.is_active)
        .bind(filter.owner_id)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM services {FILTER}"))
            .bind(filter.q.as_deref())
            .bind(filter.category.as_deref())
            .bind(filter.price_min)
            .bind(filter.price_max)
            .bind(filter.is_active)
            .bind(filter.owner_id)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(Service::from).collect(),
            total,
        ))
    }

    async fn update(&self, id: Uuid, patch: ServicePatch) -> Result<Service, AppError> {
        let update_description = patch.description.is_some();
        let new_description = patch.description.flatten();
        let update_category = patch.category.is_some();
        let new_category = patch.category.flatten();

        let row = sqlx::query_as::<_, ServiceRow>(&format!(
            r#"
            UPDATE services SET
                name             = COALESCE($2, name),
                description      = CASE WHEN $3 THEN $4::TEXT ELSE description END,
                category         = CASE WHEN $5 THEN $6::TEXT ELSE category END,
                price            = COALESCE($7::FLOAT8::NUMERIC(10, 2), price),
                duration_minutes = COALESCE($8, duration_minutes),
                is_active        = COALESCE($9, is_active),
                updated_at       = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.name)
        .bind(update_description)
        .bind(new_description)
        .bind(update_category)
        .bind(new_category)
        .bind(patch.price)
        .bind(patch.duration_minutes)
        .bind(patch.is_active)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Service::from)
            .ok_or_else(|| AppError::not_found("Service not found", json!({"id": id})))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE services SET is_active = FALSE, updated_at = NOW()
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(id)
        .execute(self.pool.as_ref())
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(
                "Service not found or already inactive",
                json!({"id": id}),
            ));
        }

        Ok(())
    }
}
