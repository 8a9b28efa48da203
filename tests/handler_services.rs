mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};
use sqlx::PgPool;
use uuid::Uuid;

// ─── PUBLIC CATALOG ──────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_list_services_is_public(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    common::create_test_service(&pool, admin.id, "Yoga").await;
    common::create_test_service(&pool, admin.id, "Massage").await;
    common::create_inactive_service(&pool, admin.id, "Retired").await;
    let server = common::make_server(pool);

    let response = server.get("/api/services").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);
    let items = body["items"].as_array().unwrap();
    assert!(items.iter().all(|s| s["is_active"] == true));
    assert!(items[0].get("price").is_some());
    assert!(items[0].get("duration_minutes").is_some());
}

#[sqlx::test]
async fn test_list_services_filters(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    common::create_test_service(&pool, admin.id, "Morning yoga").await;
    common::create_test_service(&pool, admin.id, "Massage").await;
    let server = common::make_server(pool);

    let search = server.get("/api/services?q=YOGA").await.json::<Value>();
    assert_eq!(search["total"], 1);
    assert_eq!(search["items"][0]["name"], "Morning yoga");

    let priced = server
        .get("/api/services?price_min=40&price_max=60&category=wellness")
        .await
        .json::<Value>();
    assert_eq!(priced["total"], 2);

    let none = server
        .get("/api/services?price_max=10.5")
        .await
        .json::<Value>();
    assert_eq!(none["total"], 0);
}

#[sqlx::test]
async fn test_list_services_inverted_price_range(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/api/services?price_min=100&price_max=10").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_list_services_bad_number(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/api/services?price_min=cheap").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
}

#[sqlx::test]
async fn test_get_service(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Yoga").await;
    let server = common::make_server(pool);

    let response = server.get(&format!("/api/services/{}", service.id)).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["id"], service.id.to_string());
    assert_eq!(body["name"], "Yoga");
    assert_eq!(body["price"], 49.5);
    assert_eq!(body["owner_id"], admin.id.to_string());
}

#[sqlx::test]
async fn test_get_inactive_service_is_hidden(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let service = common::create_inactive_service(&pool, admin.id, "Retired").await;
    let server = common::make_server(pool);

    server
        .get(&format!("/api/services/{}", service.id))
        .await
        .assert_status_not_found();

    let response = server
        .get(&format!("/api/admin/services/{}", service.id))
        .add_header("Authorization", common::bearer(&admin))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["is_active"], false);
}

// ─── ADMIN MANAGEMENT ────────────────────────────────────────────────────────

#[sqlx::test]
async fn test_create_service(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let server = common::make_server(pool);

    let response = server
        .post("/api/services")
        .add_header("Authorization", common::bearer(&admin))
        .json(&json!({
            "name": "Deep tissue massage",
            "description": "Ninety minutes",
            "category": "wellness",
            "price": 120.0,
            "duration_minutes": 90
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["name"], "Deep tissue massage");
    assert_eq!(body["duration_minutes"], 90);
    assert_eq!(body["is_active"], true);
    assert_eq!(body["owner_id"], admin.id.to_string());
}

#[sqlx::test]
async fn test_create_service_requires_admin(pool: PgPool) {
    let user = common::create_member(&pool).await;
    let server = common::make_server(pool);

    let response = server
        .post("/api/services")
        .add_header("Authorization", common::bearer(&user))
        .json(&json!({"name": "Nope", "price": 1.0, "duration_minutes": 10}))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
}

#[sqlx::test]
async fn test_create_service_requires_auth(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server
        .post("/api/services")
        .json(&json!({"name": "Nope", "price": 1.0, "duration_minutes": 10}))
        .await;

    response.assert_status_unauthorized();
}

#[sqlx::test]
async fn test_create_service_validation(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let server = common::make_server(pool);

    let cases = [
        json!({"name": "", "price": 10.0, "duration_minutes": 30}),
        json!({"name": "Negative", "price": -1.0, "duration_minutes": 30}),
        json!({"name": "Zero length", "price": 10.0, "duration_minutes": 0}),
        json!({"name": "Bad category", "price": 10.0, "duration_minutes": 30, "category": "Not Valid!"}),
    ];

    for case in cases {
        let response = server
            .post("/api/services")
            .add_header("Authorization", common::bearer(&admin))
            .json(&case)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[sqlx::test]
async fn test_update_service(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Yoga").await;
    let server = common::make_server(pool);

    let response = server
        .patch(&format!("/api/services/{}", service.id))
        .add_header("Authorization", common::bearer(&admin))
        .json(&json!({"price": 55.0, "description": null}))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["price"], 55.0);
    assert!(body["description"].is_null());
    assert_eq!(body["category"], "wellness");
}

#[sqlx::test]
async fn test_update_service_empty_body(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Yoga").await;
    let server = common::make_server(pool);

    let response = server
        .patch(&format!("/api/services/{}", service.id))
        .add_header("Authorization", common::bearer(&admin))
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_update_missing_service(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let server = common::make_server(pool);

    let response = server
        .patch(&format!("/api/services/{}", Uuid::new_v4()))
        .add_header("Authorization", common::bearer(&admin))
        .json(&json!({"name": "Ghost"}))
        .await;

    response.assert_status_not_found();
}

#[sqlx::test]
async fn test_delete_service_soft_deletes(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Yoga").await;
    let server = common::make_server(pool);
    let auth = common::bearer(&admin);

    server
        .delete(&format!("/api/services/{}", service.id))
        .add_header("Authorization", auth.clone())
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .get(&format!("/api/services/{}", service.id))
        .await
        .assert_status_not_found();

    server
        .delete(&format!("/api/services/{}", service.id))
        .add_header("Authorization", auth.clone())
        .await
        .assert_status_not_found();

    let restored = server
        .patch(&format!("/api/services/{}", service.id))
        .add_header("Authorization", auth)
        .json(&json!({"is_active": true}))
        .await;
    restored.assert_status_ok();
    assert_eq!(restored.json::<Value>()["is_active"], true);
}

#[sqlx::test]
async fn test_admin_list_includes_inactive(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    common::create_test_service(&pool, admin.id, "Yoga").await;
    common::create_inactive_service(&pool, admin.id, "Retired").await;
    let server = common::make_server(pool);
    let auth = common::bearer(&admin);

    let all = server
        .get("/api/admin/services")
        .add_header("Authorization", auth.clone())
        .await
        .json::<Value>();
    assert_eq!(all["total"], 2);

    let inactive = server
        .get("/api/admin/services?is_active=false")
        .add_header("Authorization", auth)
        .await
        .json::<Value>();
    assert_eq!(inactive["total"], 1);
    assert_eq!(inactive["items"][0]["name"], "Retired");
}

#[sqlx::test]
async fn test_admin_list_requires_admin(pool: PgPool) {
    let user = common::create_member(&pool).await;
    let server = common::make_server(pool);

    server
        .get("/api/admin/services")
        .add_header("Authorization", common::bearer(&user))
        .await
        .assert_status(StatusCode::FORBIDDEN);
}

// ─── REVIEWS AND BOOKINGS OF A SERVICE ───────────────────────────────────────

#[sqlx::test]
async fn test_service_reviews_and_stats(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Yoga").await;
    for (hours, rating) in [(24, 4), (48, 5)] {
        let booking = common::create_completed_booking(&pool, user.id, service.id, hours).await;
        common::create_test_review(&pool, &booking, rating).await;
    }
    let server = common::make_server(pool);

    let reviews = server
        .get(&format!("/api/services/{}/reviews", service.id))
        .await;
    reviews.assert_status_ok();
    assert_eq!(reviews.json::<Value>()["total"], 2);

    let filtered = server
        .get(&format!("/api/services/{}/reviews?min_rating=5", service.id))
        .await
        .json::<Value>();
    assert_eq!(filtered["total"], 1);

    let stats = server
        .get(&format!("/api/services/{}/reviews/stats", service.id))
        .await;
    stats.assert_status_ok();
    let body = stats.json::<Value>();
    assert_eq!(body["review_count"], 2);
    assert_eq!(body["average_rating"], 4.5);
    assert_eq!(body["min_rating"], 4);
    assert_eq!(body["max_rating"], 5);
}

#[sqlx::test]
async fn test_service_reviews_rating_out_of_range(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Yoga").await;
    let server = common::make_server(pool);

    server
        .get(&format!("/api/services/{}/reviews?min_rating=9", service.id))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .get(&format!(
            "/api/services/{}/reviews?min_rating=4&max_rating=2",
            service.id
        ))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[sqlx::test]
async fn test_stats_for_missing_service(pool: PgPool) {
    let server = common::make_server(pool);

    server
        .get(&format!("/api/services/{}/reviews/stats", Uuid::new_v4()))
        .await
        .assert_status_not_found();
}

#[sqlx::test]
async fn test_service_bookings_admin_only(pool: PgPool) {
    let admin = common::create_admin(&pool).await;
    let user = common::create_member(&pool).await;
    let service = common::create_test_service(&pool, admin.id, "Yoga").await;
    common::create_test_booking(&pool, user.id, service.id, 24).await;
    common::create_test_booking(&pool, user.id, service.id, 48).await;
    let server = common::make_server(pool);

    server
        .get(&format!("/api/services/{}/bookings", service.id))
        .add_header("Authorization", common::bearer(&user))
        .await
        .assert_status(StatusCode::FORBIDDEN);

    let response = server
        .get(&format!("/api/services/{}/bookings?status=pending", service.id))
        .add_header("Authorization", common::bearer(&admin))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["total"], 2);
}
