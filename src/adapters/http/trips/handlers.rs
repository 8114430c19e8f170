//! HTTP handlers for trip endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapters::http::error::MessageBody;
use crate::adapters::http::extract::{parse_id, JsonBody};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    CreateTripCommand, NewSavedItem, RemoveSavedItemCommand, SaveItemCommand, SavedItemKey,
    UpdateTripCommand,
};
use crate::application::AppError;
use crate::domain::foundation::{TripId, UserId};
use crate::domain::trip::{
    AccommodationInput, ActivityInput, FlightInput, SavedAccommodation, SavedActivity, SavedFlight,
    Trip,
};

use super::dto::{TripRequest, TripResponse};

const INVALID_TIMESTAMP: &str = "Invalid timestamp format";

fn parse_millis(raw: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::bad_request(INVALID_TIMESTAMP))
}

// ════════════════════════════════════════════════════════════════════════════════
// Trip CRUD
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/trips
pub async fn create_trip(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(req): JsonBody<TripRequest>,
) -> Result<(StatusCode, Json<TripResponse>), AppError> {
    let trip = state
        .create_trip_handler()
        .handle(CreateTripCommand {
            user_id: user.id,
            draft: req.into(),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(TripResponse::from(&trip))))
}

/// GET /api/trips
pub async fn list_trips(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<TripResponse>>, AppError> {
    let trips = state.list_trips_handler().handle(user.id).await?;
    Ok(Json(trips.iter().map(TripResponse::from).collect()))
}

/// GET /api/trips/:tripId
pub async fn get_trip(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = state
        .get_trip_handler()
        .handle(user.id, parse_id(&trip_id)?)
        .await?;
    Ok(Json(TripResponse::from(&trip)))
}

/// PUT /api/trips/:tripId
pub async fn update_trip(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
    JsonBody(req): JsonBody<TripRequest>,
) -> Result<Json<TripResponse>, AppError> {
    let trip = state
        .update_trip_handler()
        .handle(UpdateTripCommand {
            user_id: user.id,
            trip_id: parse_id(&trip_id)?,
            update: req.into(),
        })
        .await?;
    Ok(Json(TripResponse::from(&trip)))
}

/// DELETE /api/trips/:tripId
pub async fn delete_trip(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    state
        .delete_trip_handler()
        .handle(user.id, parse_id(&trip_id)?)
        .await?;
    Ok(Json(MessageBody::new("Trip removed successfully")))
}

// ════════════════════════════════════════════════════════════════════════════════
// Saved items
// ════════════════════════════════════════════════════════════════════════════════

async fn save(
    state: &AppState,
    user_id: UserId,
    trip_id: &str,
    item: NewSavedItem,
) -> Result<Trip, AppError> {
    let trip_id: TripId = parse_id(trip_id)?;
    state
        .saved_items_handler()
        .save(SaveItemCommand {
            user_id,
            trip_id,
            item,
        })
        .await
}

async fn remove(
    state: &AppState,
    user_id: UserId,
    trip_id: &str,
    key: SavedItemKey,
) -> Result<Trip, AppError> {
    let trip_id: TripId = parse_id(trip_id)?;
    state
        .saved_items_handler()
        .remove(RemoveSavedItemCommand {
            user_id,
            trip_id,
            key,
        })
        .await
}

/// POST /api/trips/:tripId/flights
pub async fn save_flight(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
    JsonBody(input): JsonBody<FlightInput>,
) -> Result<(StatusCode, Json<Vec<SavedFlight>>), AppError> {
    let trip = save(&state, user.id, &trip_id, NewSavedItem::Flight(input)).await?;
    Ok((StatusCode::CREATED, Json(trip.saved_flights().to_vec())))
}

/// DELETE /api/trips/:tripId/flights/:flightApiId/:departureTimestamp
pub async fn remove_flight(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((trip_id, flight_api_id, departure)): Path<(String, String, String)>,
) -> Result<Json<Vec<SavedFlight>>, AppError> {
    let key = SavedItemKey::Flight {
        flight_api_id,
        departure_millis: parse_millis(&departure)?,
    };
    let trip = remove(&state, user.id, &trip_id, key).await?;
    Ok(Json(trip.saved_flights().to_vec()))
}

/// POST /api/trips/:tripId/accommodations
pub async fn save_accommodation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
    JsonBody(input): JsonBody<AccommodationInput>,
) -> Result<(StatusCode, Json<Vec<SavedAccommodation>>), AppError> {
    let trip = save(&state, user.id, &trip_id, NewSavedItem::Accommodation(input)).await?;
    Ok((StatusCode::CREATED, Json(trip.saved_accommodations().to_vec())))
}

/// DELETE /api/trips/:tripId/accommodations/:accommodationApiId/:checkInTimestamp
pub async fn remove_accommodation(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((trip_id, accommodation_api_id, check_in)): Path<(String, String, String)>,
) -> Result<Json<Vec<SavedAccommodation>>, AppError> {
    let key = SavedItemKey::Accommodation {
        accommodation_api_id,
        check_in_millis: parse_millis(&check_in)?,
    };
    let trip = remove(&state, user.id, &trip_id, key).await?;
    Ok(Json(trip.saved_accommodations().to_vec()))
}

/// POST /api/trips/:tripId/activities
pub async fn save_activity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(trip_id): Path<String>,
    JsonBody(input): JsonBody<ActivityInput>,
) -> Result<(StatusCode, Json<Vec<SavedActivity>>), AppError> {
    let trip = save(&state, user.id, &trip_id, NewSavedItem::Activity(input)).await?;
    Ok((StatusCode::CREATED, Json(trip.saved_activities().to_vec())))
}

/// DELETE /api/trips/:tripId/activities/:activityApiId
pub async fn remove_activity(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path((trip_id, activity_api_id)): Path<(String, String)>,
) -> Result<Json<Vec<SavedActivity>>, AppError> {
    let trip = remove(&state, user.id, &trip_id, SavedItemKey::Activity { activity_api_id }).await?;
    Ok(Json(trip.saved_activities().to_vec()))
}
