//! PostgreSQL implementation of the booking repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use sqlx::{PgConnection, PgPool};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::{
    Booking, BookingFilter, BookingPatch, BookingStatus, NewBooking, PageRequest, Paginated,
};
use crate::domain::repositories::BookingRepository;
use crate::error::AppError;

const COLUMNS: &str =
    "id, user_id, service_id, start_time, end_time, status, created_at, updated_at";

const FILTER: &str = r#"
    WHERE ($1::UUID IS NULL OR user_id = $1)
      AND ($2::UUID IS NULL OR service_id = $2)
      AND ($3::TEXT IS NULL OR status = $3)
      AND ($4::TIMESTAMPTZ IS NULL OR start_time >= $4)
      AND ($5::TIMESTAMPTZ IS NULL OR start_time < $5)
"#;

// Half-open windows: a booking ending at 10:00 does not clash with one starting at 10:00.
const OVERLAP: &str = r#"
    SELECT EXISTS (
        SELECT 1 FROM bookings
        WHERE service_id = $1
          AND status IN ('pending', 'confirmed')
          AND start_time < $3
          AND end_time > $2
          AND ($4::UUID IS NULL OR id <> $4)
    )
"#;

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    service_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = AppError;

    fn try_from(r: BookingRow) -> Result<Self, Self::Error> {
        let status = r.status.parse().map_err(|e: String| {
            AppError::internal("Corrupt booking row", json!({"id": r.id, "reason": e}))
        })?;

        Ok(Booking {
            id: r.id,
            user_id: r.user_id,
            service_id: r.service_id,
            start_time: r.start_time,
            end_time: r.end_time,
            status,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

/// Locks the service row so concurrent writers for the same service queue up
/// behind the overlap check.
async fn lock_service(conn: &mut PgConnection, service_id: Uuid) -> Result<(), AppError> {
    let locked: Option<Uuid> = sqlx::query_scalar("SELECT id FROM services WHERE id = $1 FOR UPDATE")
        .bind(service_id)
        .fetch_optional(&mut *conn)
        .await?;

    if locked.is_none() {
        return Err(AppError::not_found(
            "Service not found",
            json!({"id": service_id}),
        ));
    }
    Ok(())
}

async fn overlaps(
    conn: &mut PgConnection,
    service_id: Uuid,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude: Option<Uuid>,
) -> Result<bool, AppError> {
    let exists: bool = sqlx::query_scalar(OVERLAP)
        .bind(service_id)
        .bind(start)
        .bind(end)
        .bind(exclude)
        .fetch_one(&mut *conn)
        .await?;
    Ok(exists)
}

fn slot_taken(service_id: Uuid, start: DateTime<Utc>, end: DateTime<Utc>) -> AppError {
    AppError::conflict(
        "Time slot is already booked",
        json!({"service_id": service_id, "start_time": start, "end_time": end}),
    )
}

/// PostgreSQL repository for bookings.
///
/// Writes that claim a time slot run in a transaction holding a row lock on
/// the service, so the overlap check and the write are atomic.
pub struct PgBookingRepository {
    pool: Arc<PgPool>,
}

impl PgBookingRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn create(&self, new_booking: NewBooking) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        lock_service(&mut tx, new_booking.service_id).await?;

        if overlaps(
            &mut tx,
            new_booking.service_id,
            new_booking.start_time,
            new_booking.end_time,
            None,
        )
        .await?
        {
            tx.rollback().await?;
            return Err(slot_taken(
                new_booking.service_id,
                new_booking.start_time,
                new_booking.end_time,
            ));
        }

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            INSERT INTO bookings (user_id, service_id, start_time, end_time)
            VALUES ($1, $2, $3, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(new_booking.user_id)
        .bind(new_booking.service_id)
        .bind(new_booking.start_time)
        .bind(new_booking.end_time)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let row = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {COLUMNS} FROM bookings WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        row.map(Booking::try_from).transpose()
    }

    async fn list(
        &self,
        filter: BookingFilter,
        page: PageRequest,
    ) -> Result<Paginated<Booking>, AppError> {
        let status = filter.status.map(|s| s.as_str());

        let rows = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {COLUMNS} FROM bookings {FILTER} ORDER BY start_time DESC, id LIMIT $6 OFFSET $7"
        ))
        .bind(filter.user_id)
        .bind(filter.service_id)
        .bind(status)
        .bind(filter.from)
        .bind(filter.to)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(self.pool.as_ref())
        .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM bookings {FILTER}"))
            .bind(filter.user_id)
            .bind(filter.service_id)
            .bind(status)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_one(self.pool.as_ref())
            .await?;

        let items = rows
            .into_iter()
            .map(Booking::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Paginated::new(items, total))
    }

    async fn has_overlap(
        &self,
        service_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let mut conn = self.pool.acquire().await?;
        overlaps(&mut conn, service_id, start, end, exclude).await
    }

    async fn update(&self, id: Uuid, patch: BookingPatch) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_as::<_, BookingRow>(&format!(
            "SELECT {COLUMNS} FROM bookings WHERE id = $1 FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found("Booking not found", json!({"id": id})))?;

        // The caller validated against an earlier read; re-check on the locked row.
        let status: BookingStatus = current.status.parse().map_err(|e: String| {
            AppError::internal("Corrupt booking row", json!({"id": id, "reason": e}))
        })?;

        if let Some(next) = patch.status
            && !status.can_transition_to(next)
        {
            tx.rollback().await?;
            return Err(AppError::conflict(
                format!("Cannot change booking status from {status} to {next}"),
                json!({"id": id, "from": status, "to": next}),
            ));
        }

        if patch.is_reschedule() {
            if !status.is_open() {
                tx.rollback().await?;
                return Err(AppError::conflict(
                    format!("Cannot reschedule a {status} booking"),
                    json!({"id": id, "status": status}),
                ));
            }

            let start = patch.start_time.unwrap_or(current.start_time);
            let end = patch.end_time.unwrap_or(current.end_time);

            lock_service(&mut tx, current.service_id).await?;

            if overlaps(&mut tx, current.service_id, start, end, Some(id)).await? {
                tx.rollback().await?;
                return Err(slot_taken(current.service_id, start, end));
            }
        }

        let row = sqlx::query_as::<_, BookingRow>(&format!(
            r#"
            UPDATE bookings SET
                start_time = COALESCE($2, start_time),
                end_time   = COALESCE($3, end_time),
                status     = COALESCE($4, status),
                updated_at = NOW()
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(patch.start_time)
        .bind(patch.end_time)
        .bind(patch.status.map(|s| s.as_str()))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        row.try_into()
    }
}
