mod common;

use axum::http::StatusCode;
use bookit_api::domain::entities::{BookingStatus, Role};
use chrono::{DateTime, Duration, Utc};
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

fn at(hours_from_now: i64) -> DateTime<Utc> {
    Utc::now() + Duration::hours(hours_from_now)
}

// ─── CREATE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_booking(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let server = common::make_server(pool);

    let start = at(24);
    let response = server
        .post("/api/bookings")
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({
            "service_id": service.id,
            "start_time": start,
            "end_time": start + Duration::hours(1)
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "pending");
    assert_eq!(body["user_id"], user.id.to_string());
    assert_eq!(body["service_id"], service.id.to_string());

    let returned: DateTime<Utc> = serde_json::from_value(body["start_time"].clone()).unwrap();
    assert_eq!(returned.timestamp(), start.timestamp());
}

#[sqlx::test]
async fn test_create_booking_requires_auth(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server
        .post("/api/bookings")
        .json(&json!({
            "service_id": Uuid::new_v4(),
            "start_time": at(24),
            "end_time": at(25)
        }))
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_create_booking_overlap(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let other = common::create_test_user(&pool, "other@example.com", Role::User).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let existing = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);

    let response = server
        .post("/api/bookings")
        .add_header("Authorization", common::bearer(&other))
        .json(&json!({
            "service_id": service.id,
            "start_time": existing.start_time + Duration::minutes(30),
            "end_time": existing.end_time + Duration::minutes(30)
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "conflict");
}

#[sqlx::test]
async fn test_create_booking_back_to_back(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let existing = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);

    let response = server
        .post("/api/bookings")
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({
            "service_id": service.id,
            "start_time": existing.end_time,
            "end_time": existing.end_time + Duration::hours(1)
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
}

#[sqlx::test]
async fn test_create_booking_invalid_window(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let server = common::make_server(pool);

    let past = server
        .post("/api/bookings")
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({"service_id": service.id, "start_time": at(-2), "end_time": at(-1)}))
        .await;
    past.assert_status(StatusCode::BAD_REQUEST);

    let inverted = server
        .post("/api/bookings")
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({"service_id": service.id, "start_time": at(26), "end_time": at(25)}))
        .await;
    inverted.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_create_booking_inactive_service(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_inactive_service(&pool, admin.id, "Retired").await;
    let server = common::make_server(pool);

    let response = server
        .post("/api/bookings")
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({"service_id": service.id, "start_time": at(24), "end_time": at(25)}))
        .await;

    response.assert_status_not_found();
}

// ─── READ ────────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_list_bookings_only_own(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let other = common::create_test_user(&pool, "other@example.com", Role::User).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    common::create_test_booking(&pool, user.id, service.id, 24).await;
    common::create_test_booking(&pool, user.id, service.id, 48).await;
    common::create_test_booking(&pool, other.id, service.id, 72).await;
    let server = common::make_server(pool);

    let response = server
        .get("/api/bookings")
        .add_header("Authorization", common::bearer(&user))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);
    let items = body["items"].as_array().unwrap();
    assert!(items.iter().all(|b| b["user_id"] == user.id.to_string()));
}

#[sqlx::test]
async fn test_list_bookings_status_filter(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let first = common::create_test_booking(&pool, user.id, service.id, 24).await;
    common::create_test_booking(&pool, user.id, service.id, 48).await;
    common::set_booking_status(&pool, first.id, BookingStatus::Cancelled).await;
    let server = common::make_server(pool);

    let body = server
        .get("/api/bookings?status=cancelled")
        .add_header("Authorization", common::bearer(&user))
        .await
        .json::<Value>();

    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["id"], first.id.to_string());
}

#[sqlx::test]
async fn test_get_booking_access(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let other = common::create_test_user(&pool, "other@example.com", Role::User).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);
    let path = format!("/api/bookings/{}", booking.id);

    server
        .get(&path)
        .add_header("Authorization", common::bearer(&user))
        .await
        .assert_status_ok();

    server
        .get(&path)
        .add_header("Authorization", common::bearer(&admin))
        .await
        .assert_status_ok();

    server
        .get(&path)
        .add_header("Authorization", common::bearer(&other))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    server
        .get(&format!("/api/bookings/{}", Uuid::new_v4()))
        .add_header("Authorization", common::bearer(&user))
        .await
        .assert_status_not_found();
}

// ─── UPDATE ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_reschedule_booking(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);

    let new_start = booking.start_time + Duration::minutes(30);
    let response = server
        .patch(&format!("/api/bookings/{}", booking.id))
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({"start_time": new_start, "end_time": new_start + Duration::hours(1)}))
        .await;

    response.assert_status_ok();
    let returned: DateTime<Utc> =
        serde_json::from_value(response.json::<Value>()["start_time"].clone()).unwrap();
    assert_eq!(returned.timestamp(), new_start.timestamp());
}

#[sqlx::test]
async fn test_owner_cannot_confirm(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);

    let response = server
        .patch(&format!("/api/bookings/{}", booking.id))
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({"status": "confirmed"}))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn test_update_booking_empty_body(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);

    let response = server
        .patch(&format!("/api/bookings/{}", booking.id))
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_unknown_status_rejected(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);

    let response = server
        .patch(&format!("/api/admin/bookings/{}/status", booking.id))
        .add_header("Authorization", common::bearer(&admin))
        .json(&json!({"status": "done"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

// ─── CANCEL ──────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_cancel_booking(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);
    let path = format!("/api/bookings/{}", booking.id);

    let response = server
        .delete(&path)
        .add_header("Authorization", common::bearer(&user))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "cancelled");

    server
        .delete(&path)
        .add_header("Authorization", common::bearer(&user))
        .await
        .assert_status(StatusCode::CONFLICT);

    server
        .post("/api/bookings")
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({
            "service_id": service.id,
            "start_time": booking.start_time,
            "end_time": booking.end_time
        }))
        .await
        .assert_status(StatusCode::CREATED);
}

#[sqlx::test]
async fn test_owner_cannot_cancel_started_booking(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking =
        common::create_past_booking(&pool, user.id, service.id, BookingStatus::Confirmed).await;
    let server = common::make_server(pool);
    let path = format!("/api/bookings/{}", booking.id);

    server
        .delete(&path)
        .add_header("Authorization", common::bearer(&user))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .delete(&path)
        .add_header("Authorization", common::bearer(&admin))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["status"], "cancelled");
}

#[sqlx::test]
async fn test_cancel_foreign_booking_forbidden(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let other = common::create_test_user(&pool, "other@example.com", Role::User).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);

    server
        .delete(&format!("/api/bookings/{}", booking.id))
        .add_header("Authorization", common::bearer(&other))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// ─── ADMIN ───────────────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_admin_status_lifecycle(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);
    let path = format!("/api/admin/bookings/{}/status", booking.id);
    let auth = common::bearer(&admin);

    for status in ["confirmed", "completed"] {
        let response = server
            .patch(&path)
            .add_header("Authorization", auth.clone())
            .json(&json!({"status": status}))
            .await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["status"], status);
    }

    server
        .patch(&path)
        .add_header("Authorization", auth)
        .json(&json!({"status": "pending"}))
        .await
        .assert_status(StatusCode::CONFLICT);
}

#[sqlx::test]
async fn test_set_status_requires_admin(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let booking = common::create_test_booking(&pool, user.id, service.id, 24).await;
    let server = common::make_server(pool);

    server
        .patch(&format!("/api/admin/bookings/{}/status", booking.id))
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({"status": "completed"}))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn test_admin_list_bookings(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let other = common::create_test_user(&pool, "other@example.com", Role::User).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    common::create_test_booking(&pool, user.id, service.id, 24).await;
    common::create_test_booking(&pool, other.id, service.id, 48).await;
    let server = common::make_server(pool);
    let auth = common::bearer(&admin);

    let all = server
        .get("/api/admin/bookings")
        .add_header("Authorization", auth.clone())
        .await;
    all.assert_status_ok();
    assert_eq!(all.json::<Value>()["total"], 2);

    let filtered = server
        .get(&format!("/api/admin/bookings?user_id={}", other.id))
        .add_header("Authorization", auth)
        .await
        .json::<Value>();
    assert_eq!(filtered["total"], 1);
    assert_eq!(filtered["items"][0]["user_id"], other.id.to_string());
}

#[sqlx::test]
async fn test_booking_review_endpoint(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Massage").await;
    let reviewed = common::create_completed_booking(&pool, user.id, service.id, 24).await;
    let unreviewed = common::create_completed_booking(&pool, user.id, service.id, 48).await;
    let review = common::create_test_review(&pool, &reviewed, 4).await;
    let server = common::make_server(pool);

    let response = server
        .get(&format!("/api/bookings/{}/review", reviewed.id))
        .add_header("Authorization", common::bearer(&user))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["id"], review.id.to_string());

    server
        .get(&format!("/api/bookings/{}/review", unreviewed.id))
        .add_header("Authorization", common::bearer(&user))
        .await
        .assert_status_not_found();
}
