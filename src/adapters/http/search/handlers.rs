//! HTTP handlers for search endpoints.

use axum::extract::{Query, State};
use axum::Json;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::AppError;
use crate::domain::search::{AccommodationOffer, FlightOffer, PlaceResult};

use super::dto::{AccommodationSearchQuery, FlightSearchQuery, PlaceSearchQuery};

/// GET /api/search/flights
pub async fn search_flights(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<FlightSearchQuery>,
) -> Result<Json<Vec<FlightOffer>>, AppError> {
    let offers = state.search_handler().flights(query.into()).await?;
    Ok(Json(offers))
}

/// GET /api/search/accommodations
pub async fn search_accommodations(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<AccommodationSearchQuery>,
) -> Result<Json<Vec<AccommodationOffer>>, AppError> {
    let offers = state.search_handler().accommodations(query.into()).await?;
    Ok(Json(offers))
}

/// GET /api/search/events
pub async fn search_places(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(query): Query<PlaceSearchQuery>,
) -> Result<Json<Vec<PlaceResult>>, AppError> {
    let places = state
        .search_handler()
        .places(query.destination_city, query.search_term)
        .await?;
    Ok(Json(places))
}
