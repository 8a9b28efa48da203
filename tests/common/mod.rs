#![allow(dead_code)]

use bookit_api::domain::entities::{
    Booking, BookingPatch, BookingStatus, NewBooking, NewReview, NewService, NewUser, Review,
    Role, Service, TokenKind, User,
};
use bookit_api::domain::repositories::{
    BookingRepository, ReviewRepository, ServiceRepository, UserRepository,
};
use bookit_api::infrastructure::persistence::{
    PgBookingRepository, PgReviewRepository, PgServiceRepository, PgUserRepository,
};
use bookit_api::infrastructure::security::{JwtCodec, hash_password};
use bookit_api::routes::api_router;
use bookit_api::state::AppState;

use axum_test::TestServer;
use chrono::{Duration, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "correct-horse-battery";

pub fn test_codec() -> JwtCodec {
    JwtCodec::new(
        "test-signing-secret-that-is-long-enough",
        Duration::minutes(30),
        Duration::days(7),
    )
}

pub fn create_test_state(pool: PgPool) -> AppState {
    AppState::new(Arc::new(pool), test_codec())
}

pub fn make_server(pool: PgPool) -> TestServer {
    TestServer::new(api_router(create_test_state(pool))).unwrap()
}

/// `Authorization` header value with a fresh access token for `user`.
pub fn bearer(user: &User) -> String {
    let issued = test_codec()
        .issue(user.id, user.role, TokenKind::Access)
        .unwrap();
    format!("Bearer {}", issued.token)
}

pub async fn create_test_user(pool: &PgPool, email: &str, role: Role) -> User {
    PgUserRepository::new(Arc::new(pool.clone()))
        .create(NewUser {
            email: email.to_string(),
            name: email.split('@').next().unwrap_or("user").to_string(),
            password_hash: hash_password(TEST_PASSWORD).unwrap(),
            role,
        })
        .await
        .unwrap()
}

pub async fn create_member(pool: &PgPool) -> User {
    create_test_user(pool, "member@example.com", Role::User).await
}

pub async fn create_admin(pool: &PgPool) -> User {
    create_test_user(pool, "admin@example.com", Role::Admin).await
}

pub async fn deactivate_user(pool: &PgPool, id: Uuid) {
    sqlx::query("UPDATE users SET is_active = FALSE WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn create_test_service(pool: &PgPool, owner_id: Uuid, name: &str) -> Service {
    PgServiceRepository::new(Arc::new(pool.clone()))
        .create(NewService {
            name: name.to_string(),
            description: Some(format!("{name} description")),
            category: Some("wellness".to_string()),
            price: 49.5,
            duration_minutes: 60,
            owner_id,
        })
        .await
        .unwrap()
}

pub async fn create_inactive_service(pool: &PgPool, owner_id: Uuid, name: &str) -> Service {
    let service = create_test_service(pool, owner_id, name).await;
    sqlx::query("UPDATE services SET is_active = FALSE WHERE id = $1")
        .bind(service.id)
        .execute(pool)
        .await
        .unwrap();
    Service {
        is_active: false,
        ..service
    }
}

/// Pending one-hour booking starting `hours_from_now` hours ahead.
pub async fn create_test_booking(
    pool: &PgPool,
    user_id: Uuid,
    service_id: Uuid,
    hours_from_now: i64,
) -> Booking {
    let start_time = Utc::now() + Duration::hours(hours_from_now);
    PgBookingRepository::new(Arc::new(pool.clone()))
        .create(NewBooking {
            user_id,
            service_id,
            start_time,
            end_time: start_time + Duration::hours(1),
        })
        .await
        .unwrap()
}

/// Booking whose window is already over, inserted directly.
pub async fn create_past_booking(
    pool: &PgPool,
    user_id: Uuid,
    service_id: Uuid,
    status: BookingStatus,
) -> Booking {
    let id: Uuid = sqlx::query_scalar(
        "INSERT INTO bookings (user_id, service_id, start_time, end_time, status)
         VALUES ($1, $2, NOW() - INTERVAL '3 hours', NOW() - INTERVAL '2 hours', $3)
         RETURNING id",
    )
    .bind(user_id)
    .bind(service_id)
    .bind(status.as_str())
    .fetch_one(pool)
    .await
    .unwrap();

    PgBookingRepository::new(Arc::new(pool.clone()))
        .find_by_id(id)
        .await
        .unwrap()
        .unwrap()
}

pub async fn set_booking_status(pool: &PgPool, id: Uuid, status: BookingStatus) -> Booking {
    PgBookingRepository::new(Arc::new(pool.clone()))
        .update(
            id,
            BookingPatch {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

pub async fn create_completed_booking(
    pool: &PgPool,
    user_id: Uuid,
    service_id: Uuid,
    hours_from_now: i64,
) -> Booking {
    let booking = create_test_booking(pool, user_id, service_id, hours_from_now).await;
    set_booking_status(pool, booking.id, BookingStatus::Completed).await
}

pub async fn create_test_review(pool: &PgPool, booking: &Booking, rating: i16) -> Review {
    PgReviewRepository::new(Arc::new(pool.clone()))
        .create(NewReview {
            booking_id: booking.id,
            user_id: booking.user_id,
            service_id: booking.service_id,
            rating,
            comment: Some(format!("Rated {rating}")),
        })
        .await
        .unwrap()
}
