//! HTTP integration tests for health, rate limiting, and the search proxy.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use budget_backpack::config::{RateLimitConfig, WindowLimit};

use common::{relaxed_limits, TestApp};

// ════════════════════════════════════════════════════════════════════════════════
// Health
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn health_reports_status_and_environment() {
    let app = TestApp::new();

    let (status, body) = app.send("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "OK");
    assert!(body["timestamp"].as_str().is_some());
    assert!(body["environment"].as_str().is_some());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = TestApp::new();

    let (status, _) = app.send("GET", "/api/nowhere", None, None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_body_is_rejected_before_the_handler_runs() {
    let app = TestApp::with_body_limit(256);
    let padded = json!({
        "username": "alice",
        "email": "alice@example.com",
        "password": "Abc123!",
        "bio": "x".repeat(512),
    });

    let (status, body) = app
        .send("POST", "/api/auth/register", None, Some(padded))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let msg = body["msg"].as_str().unwrap();
    assert!(msg.starts_with("Invalid request body"), "{}", msg);
    assert!(msg.contains("limit"), "{}", msg);
    // Nothing was stored, so the same account can still be created.
    app.register("alice", "alice@example.com").await;
}

#[tokio::test]
async fn oversized_webhook_payload_is_rejected() {
    let app = TestApp::with_body_limit(256);
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/subscriptions/webhook")
        .header("Stripe-Signature", "t=1,v1=00")
        .body(axum::body::Body::from(vec![b'{'; 1024]))
        .unwrap();

    let (status, _) = app.dispatch(request).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.webhook_events.records().await.is_empty());
}

// ════════════════════════════════════════════════════════════════════════════════
// Rate limiting
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn sixth_login_attempt_is_throttled() {
    let app = TestApp::with_rate_limits(RateLimitConfig {
        auth: WindowLimit::auth(),
        ..relaxed_limits()
    });
    let credentials = json!({ "email": "nobody@example.com", "password": "Abc123!" });

    for _ in 0..5 {
        let (status, _) = app
            .send("POST", "/api/auth/login", None, Some(credentials.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let (status, body) = app
        .send("POST", "/api/auth/login", None, Some(credentials))
        .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["error"],
        "Too many authentication attempts from this IP, please try again after 15 minutes."
    );
    assert!(body["retryAfter"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn auth_budget_does_not_throttle_other_routes() {
    let app = TestApp::with_rate_limits(RateLimitConfig {
        auth: WindowLimit {
            max_requests: 1,
            window_secs: 60,
        },
        ..relaxed_limits()
    });
    let token = app.register("alice", "alice@example.com").await;

    for _ in 0..3 {
        let (status, _) = app.send("GET", "/api/auth/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn general_budget_covers_every_route() {
    let app = TestApp::with_rate_limits(RateLimitConfig {
        general: WindowLimit {
            max_requests: 2,
            window_secs: 60,
        },
        ..relaxed_limits()
    });

    app.send("GET", "/health", None, None).await;
    app.send("GET", "/api/posts", None, None).await;
    let (status, body) = app.send("GET", "/api/groups", None, None).await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        body["error"],
        "Too many requests from this IP, please try again later."
    );
}

// ════════════════════════════════════════════════════════════════════════════════
// Search proxy
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn search_requires_authentication() {
    let app = TestApp::new();

    let (status, _) = app
        .send(
            "GET",
            "/api/search/flights?origin=LHR&destination=LIS&departureDate=2025-07-01",
            None,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(app.search.flight_origins.lock().unwrap().is_empty());
}

#[tokio::test]
async fn flight_search_without_destination_never_reaches_provider() {
    let app = TestApp::new();
    let token = app.register("alice", "alice@example.com").await;

    let (status, _) = app
        .send(
            "GET",
            "/api/search/flights?origin=LHR&departureDate=2025-07-01",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(app.search.flight_origins.lock().unwrap().is_empty());
}

#[tokio::test]
async fn valid_flight_search_is_forwarded() {
    let app = TestApp::new();
    let token = app.register("alice", "alice@example.com").await;

    let (status, body) = app
        .send(
            "GET",
            "/api/search/flights?origin=LHR&destination=LIS&departureDate=2025-07-01&adults=2",
            Some(&token),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
    assert_eq!(app.search.flight_origins.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn event_search_requires_a_city() {
    let app = TestApp::new();
    let token = app.register("alice", "alice@example.com").await;

    let (status, _) = app
        .send("GET", "/api/search/events?searchTerm=museums", Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
