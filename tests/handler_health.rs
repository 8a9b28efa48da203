mod common;

use axum::{Router, routing::get};
use axum_test::TestServer;
use bookit_api::api::handlers::health_handler;
use sqlx::PgPool;

#[sqlx::test]
async fn test_health_endpoint_success(pool: PgPool) {
    let state = common::create_test_state(pool);
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["database"]["status"], "ok");
}

#[sqlx::test]
async fn test_health_endpoint_structure(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/health").await;

    let json = response.json::<serde_json::Value>();

    assert!(json.get("status").is_some());
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert!(json["checks"].get("database").is_some());
    assert!(json["checks"]["database"].get("message").is_none());
}

#[sqlx::test]
async fn test_health_degraded_when_pool_closed(pool: PgPool) {
    let state = common::create_test_state(pool.clone());
    pool.close().await;
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["checks"]["database"]["status"], "error");
}

#[sqlx::test]
async fn test_root_welcome(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "Welcome to the BookIT API");
    assert_eq!(json["docs"], "/docs");
}

#[sqlx::test]
async fn test_openapi_document_served(pool: PgPool) {
    let server = common::make_server(pool);

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert!(json["paths"].get("/api/bookings").is_some());
    assert!(json["components"]["securitySchemes"].get("bearer_auth").is_some());
}
