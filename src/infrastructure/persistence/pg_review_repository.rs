//! PostgreSQL implementation of the review repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{
    NewReview, PageRequest, Paginated, RatingStats, Review, ReviewFilter, ReviewPatch,
};
use crate::domain::repositories::ReviewRepository;
use crate::error::AppError;

const COLUMNS: &str =
    "id, booking_id, user_id, service_id, rating, comment, created_at, updated_at";

const FILTER: &str = r#"
    WHERE ($1::UUID IS NULL OR user_id = $1)
      AND ($2::UUID IS NULL OR service_id = $2)
      AND ($3::SMALLINT IS NULL OR rating >= $3)
      AND ($4::SMALLINT IS NULL OR rating <= $4)
"#;

#[derive(sqlx::FromRow)]
struct ReviewRow {
    id: Uuid,
    booking_id: Uuid,
    user_id: Uuid,
    service_id: Uuid,
    rating: i16,
    comment: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(r: ReviewRow) -> Self {
        Review {
            id: r.id,
            booking_id: r.booking_id,
            user_id: r.user_id,
            service_id: r.service_id,
            rating: r.rating,
            comment: r.comment,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StatsRow {
    review_count: i64,
    average_rating: Option<f64>,
    min_rating: Option<i16>,
    max_rating: Option<i16>,
}

/// PostgreSQL repository for reviews.
pub struct PgReviewRepository {
    pool: Arc<PgPool>,
}

impl PgReviewRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for PgReviewRepository {
    async fn create(&self, new_review: NewReview) -> Result<Review, AppError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            INSERT INTO reviews (booking_id, user_id, service_id, rating, comment)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new_review.booking_id)
        .bind(new_review.user_id)
        .bind(new_review.service_id)
        .bind(new_review.rating)
        .bind(&new_review.comment)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Review>, AppError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Review::from))
    }

    async fn find_by_booking(&self, booking_id: Uuid) -> Result<Option<Review>, AppError> {
        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE booking_id = $1"
        ))
        .bind(booking_id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(row.map(Review::from))
    }

    async fn list(
        &self,
        filter: ReviewFilter,
        page: PageRequest,
    ) -> Result<Paginated<Review>, AppError> {
        let rows = sqlx::query_as::<_, ReviewRow>(&format!(
            "SELECT {COLUMNS} FROM reviews {FILTER} ORDER BY created_at DESC, id LIMIT $5 OFFSET $6"
        ))
        .bind(filter.user_id)
        .bind(filter.service_id)
        .bind(filter.min_rating)
        .bind(filter.max_rating)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM reviews {FILTER}"))
            .bind(filter.user_id)
            .bind(filter.service_id)
            .bind(filter.min_rating)
            .bind(filter.max_rating)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(Paginated::new(
            rows.into_iter().map(Review::from).collect(),
            total,
        ))
    }

    async fn update(&self, id: Uuid, patch: ReviewPatch) -> Result<Review, AppError> {
        let update_comment = patch.comment.is_some();
        let new_comment = patch.comment.flatten();

        let row = sqlx::query_as::<_, ReviewRow>(&format!(
            r#"
            UPDATE reviews SET
                rating     = COALESCE($2, rating),
                comment    = CASE WHEN $3 THEN $4::TEXT ELSE comment END,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.rating)
        .bind(update_comment)
        .bind(new_comment)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Review::from)
            .ok_or_else(|| AppError::not_found("Review not found", json!({"id": id})))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("Review not found", json!({"id": id})));
        }

        Ok(())
    }

    async fn rating_stats(&self, service_id: Uuid) -> Result<RatingStats, AppError> {
        let row = sqlx::query_as::<_, StatsRow>(
            r#"
            SELECT COUNT(*)                                AS review_count,
                   ROUND(AVG(rating)::NUMERIC, 2)::FLOAT8  AS average_rating,
                   MIN(rating)                             AS min_rating,
                   MAX(rating)                             AS max_rating
            FROM reviews
            WHERE service_id = $1
            "#,
        )
        .bind(service_id)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(RatingStats {
            service_id,
            review_count: row.review_count,
            average_rating: row.average_rating,
            min_rating: row.min_rating,
            max_rating: row.max_rating,
        })
    }
}
