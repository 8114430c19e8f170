//! Axum router for trip endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    create_trip, delete_trip, get_trip, list_trips, remove_accommodation, remove_activity,
    remove_flight, save_accommodation, save_activity, save_flight, update_trip,
};

/// Routes mounted at `/api/trips`.
pub fn trip_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_trip).get(list_trips))
        .route("/:trip_id", get(get_trip).put(update_trip).delete(delete_trip))
        .route("/:trip_id/flights", post(save_flight))
        .route(
            "/:trip_id/flights/:flight_api_id/:departure_timestamp",
            delete(remove_flight),
        )
        .route("/:trip_id/accommodations", post(save_accommodation))
        .route(
            "/:trip_id/accommodations/:accommodation_api_id/:check_in_timestamp",
            delete(remove_accommodation),
        )
        .route("/:trip_id/activities", post(save_activity))
        .route("/:trip_id/activities/:activity_api_id", delete(remove_activity))
}
