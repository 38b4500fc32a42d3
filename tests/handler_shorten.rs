mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{Value, json};
use shortscale::domain::analytics_event::EventKind;
use shortscale::domain::repositories::MappingStore;

#[tokio::test]
async fn test_shorten_generated_code() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com/page" }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["shortCode"], "1");
    assert_eq!(json["originalUrl"], "https://example.com/page");
    // Trailing slash on BASE_URL is trimmed
    assert_eq!(json["shortUrl"], "http://localhost:3000/1");
}

#[tokio::test]
async fn test_shorten_custom_code_with_ttl() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({
            "originalUrl": "https://example.com",
            "customShortCode": "promo_2024",
            "ttlSeconds": 3600
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["shortCode"], "promo_2024");

    let stored = ctx.store.find_by_short_code("promo_2024").await.unwrap().unwrap();
    assert!(stored.expires_at.is_some());
    assert_eq!(stored.click_count, 0);
}

#[tokio::test]
async fn test_shorten_empty_custom_code_generates() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com", "customShortCode": "" }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["shortCode"], "1");
}

#[tokio::test]
async fn test_shorten_duplicate_custom_code() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://first.com", "customShortCode": "abc123" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://second.com", "customShortCode": "abc123" }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["code"], "conflict");

    let stored = ctx.store.find_by_short_code("abc123").await.unwrap().unwrap();
    assert_eq!(stored.original_url, "https://first.com");
    assert_eq!(ctx.store.len(), 1);
}

#[tokio::test]
async fn test_shorten_invalid_url() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    for bad in ["not-a-url", "ftp://example.com/file", ""] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "originalUrl": bad }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }

    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_shorten_invalid_custom_code() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com", "customShortCode": "no spaces" }))
        .await;

    response.assert_status_bad_request();
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_shorten_reserved_custom_code() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    for code in ["health", "api"] {
        let response = server
            .post("/api/shorten")
            .json(&json!({ "originalUrl": "https://example.com", "customShortCode": code }))
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"]["code"], "validation_error");
    }
    assert!(ctx.store.is_empty());

    // The fixed route keeps answering
    let health = server.get("/health").await;
    health.assert_status_ok();
    assert_eq!(health.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn test_shorten_ttl_too_large() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    let response = server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com", "ttlSeconds": i64::MAX }))
        .await;

    response.assert_status_bad_request();
    assert!(ctx.store.is_empty());
}

#[tokio::test]
async fn test_shorten_emits_analytics_event() {
    let mut ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://example.com" }))
        .await
        .assert_status_ok();

    let event = ctx.analytics_rx.try_recv().unwrap();
    assert_eq!(event.kind, EventKind::Shorten);
    assert_eq!(event.short_code, "1");
}

#[tokio::test]
async fn test_bulk_shorten_preserves_order() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    let response = server
        .post("/api/shorten/bulk")
        .json(&json!({
            "requests": [
                { "originalUrl": "https://a.com" },
                { "originalUrl": "https://b.com", "customShortCode": "bee" },
                { "originalUrl": "https://c.com" }
            ]
        }))
        .await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    let items = json["responses"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["originalUrl"], "https://a.com");
    assert_eq!(items[1]["originalUrl"], "https://b.com");
    assert_eq!(items[1]["shortCode"], "bee");
    assert_eq!(items[2]["originalUrl"], "https://c.com");
    assert_ne!(items[0]["shortCode"], items[2]["shortCode"]);
}

#[tokio::test]
async fn test_bulk_shorten_aborts_on_first_failure() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    server
        .post("/api/shorten")
        .json(&json!({ "originalUrl": "https://taken.com", "customShortCode": "taken" }))
        .await
        .assert_status_ok();

    let response = server
        .post("/api/shorten/bulk")
        .json(&json!({
            "requests": [
                { "originalUrl": "https://a.com", "customShortCode": "first" },
                { "originalUrl": "https://b.com", "customShortCode": "taken" },
                { "originalUrl": "https://c.com", "customShortCode": "never" }
            ]
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert!(ctx.store.exists_by_short_code("first").await.unwrap());
    assert!(!ctx.store.exists_by_short_code("never").await.unwrap());
}

#[tokio::test]
async fn test_bulk_shorten_rejects_invalid_item_before_creating() {
    let ctx = common::create_test_state();
    let server = TestServer::new(common::test_app(ctx.state.clone())).unwrap();

    let response = server
        .post("/api/shorten/bulk")
        .json(&json!({
            "requests": [
                { "originalUrl": "https://a.com" },
                { "originalUrl": "https://b.com", "customShortCode": "bad code" }
            ]
        }))
        .await;

    response.assert_status_bad_request();
    assert!(ctx.store.is_empty());
}
