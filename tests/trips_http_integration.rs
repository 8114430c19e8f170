//! HTTP integration tests for trip planning and saved items.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::TestApp;

const DEPARTURE: &str = "2025-07-01T10:30:00Z";
const DEPARTURE_MILLIS: i64 = 1_751_365_800_000;

fn lisbon() -> Value {
    json!({
        "tripName": "Summer in Lisbon",
        "destinationCity": "Lisbon",
        "destinationCountry": "Portugal",
        "startDate": "2025-07-01",
        "endDate": "2025-07-10",
        "budget": 1200.0
    })
}

fn flight() -> Value {
    json!({
        "flightApiId": "F-100",
        "origin": "LHR",
        "destination": "LIS",
        "departureDate": DEPARTURE,
        "price": 89.5
    })
}

async fn create_trip(app: &TestApp, token: &str) -> String {
    let (status, body) = app.send("POST", "/api/trips", Some(token), Some(lisbon())).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["id"].as_str().unwrap().to_string()
}

// ════════════════════════════════════════════════════════════════════════════════
// Trip CRUD
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn created_trip_is_listed_for_its_owner_only() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let bob = app.register("bob", "bob@example.com").await;
    let trip_id = create_trip(&app, &alice).await;

    let (status, mine) = app.send("GET", "/api/trips", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine.as_array().unwrap().len(), 1);
    assert_eq!(mine[0]["id"], trip_id.as_str());
    assert_eq!(mine[0]["isPublic"], false);

    let (_, theirs) = app.send("GET", "/api/trips", Some(&bob), None).await;
    assert!(theirs.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn end_date_before_start_date_is_rejected() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let mut body = lisbon();
    body["endDate"] = json!("2025-06-20");

    let (status, response) = app.send("POST", "/api/trips", Some(&alice), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["errors"][0]["field"], "endDate");
    assert_eq!(response["errors"][0]["msg"], "End date must be after start date");
}

#[tokio::test]
async fn other_users_cannot_read_update_or_delete_a_trip() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let bob = app.register("bob", "bob@example.com").await;
    let trip_id = create_trip(&app, &alice).await;
    let uri = format!("/api/trips/{}", trip_id);

    let (status, _) = app.send("GET", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send("PUT", &uri, Some(&bob), Some(json!({ "notes": "mine now" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app.send("DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["msg"], "User not authorized to delete this trip.");

    let (status, trip) = app.send("GET", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(trip["notes"], "");
}

#[tokio::test]
async fn partial_update_keeps_unsent_fields() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let trip_id = create_trip(&app, &alice).await;

    let (status, trip) = app
        .send(
            "PUT",
            &format!("/api/trips/{}", trip_id),
            Some(&alice),
            Some(json!({ "notes": "Pack sunscreen", "isPublic": true })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(trip["notes"], "Pack sunscreen");
    assert_eq!(trip["isPublic"], true);
    assert_eq!(trip["tripName"], "Summer in Lisbon");
}

#[tokio::test]
async fn deleted_trip_is_gone() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let trip_id = create_trip(&app, &alice).await;
    let uri = format!("/api/trips/{}", trip_id);

    let (status, body) = app.send("DELETE", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["msg"], "Trip removed successfully");

    let (status, body) = app.send("GET", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["msg"], "Trip not found");
}

#[tokio::test]
async fn malformed_trip_id_is_a_bad_request() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;

    let (status, body) = app.send("GET", "/api/trips/123", Some(&alice), None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Invalid ID format");
}

// ════════════════════════════════════════════════════════════════════════════════
// Saved items
// ════════════════════════════════════════════════════════════════════════════════

#[tokio::test]
async fn flight_can_be_saved_once_and_removed_by_departure_time() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let trip_id = create_trip(&app, &alice).await;
    let flights_uri = format!("/api/trips/{}/flights", trip_id);

    let (status, saved) = app.send("POST", &flights_uri, Some(&alice), Some(flight())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved.as_array().unwrap().len(), 1);
    assert_eq!(saved[0]["flightApiId"], "F-100");

    let (status, body) = app.send("POST", &flights_uri, Some(&alice), Some(flight())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "This specific flight is already saved to this trip.");

    let wrong_time = format!("{}/F-100/{}", flights_uri, DEPARTURE_MILLIS + 1000);
    let (status, _) = app.send("DELETE", &wrong_time, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let exact = format!("{}/F-100/{}", flights_uri, DEPARTURE_MILLIS);
    let (status, remaining) = app.send("DELETE", &exact, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(remaining.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn non_numeric_departure_timestamp_is_a_bad_request() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let trip_id = create_trip(&app, &alice).await;

    let (status, body) = app
        .send(
            "DELETE",
            &format!("/api/trips/{}/flights/F-100/tomorrow", trip_id),
            Some(&alice),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["msg"], "Invalid timestamp format");
}

#[tokio::test]
async fn incomplete_flight_is_rejected() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let trip_id = create_trip(&app, &alice).await;

    let (status, body) = app
        .send(
            "POST",
            &format!("/api/trips/{}/flights", trip_id),
            Some(&alice),
            Some(json!({ "flightApiId": "F-100" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["msg"],
        "Missing required flight data (ID, origin, destination, departureDate)."
    );
}

#[tokio::test]
async fn activities_are_keyed_by_api_id() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let trip_id = create_trip(&app, &alice).await;
    let uri = format!("/api/trips/{}/activities", trip_id);
    let activity = json!({ "activityApiId": "place-1", "name": "Tram 28" });

    let (status, saved) = app.send("POST", &uri, Some(&alice), Some(activity.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(saved[0]["name"], "Tram 28");

    let (status, _) = app.send("POST", &uri, Some(&alice), Some(activity)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, remaining) = app
        .send("DELETE", &format!("{}/place-1", uri), Some(&alice), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(remaining.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn stranger_cannot_save_items_to_a_trip() {
    let app = TestApp::new();
    let alice = app.register("alice", "alice@example.com").await;
    let bob = app.register("bob", "bob@example.com").await;
    let trip_id = create_trip(&app, &alice).await;

    let (status, _) = app
        .send(
            "POST",
            &format!("/api/trips/{}/flights", trip_id),
            Some(&bob),
            Some(flight()),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}
