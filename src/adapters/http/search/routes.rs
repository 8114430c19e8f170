//! Axum router for search endpoints.

use axum::{middleware, routing::get, Router};

use crate::adapters::http::middleware::{rate_limit_middleware, RateLimitState};
use crate::adapters::http::state::AppState;
use crate::ports::RateLimitClass;

use super::handlers::{search_accommodations, search_flights, search_places};

/// Routes mounted at `/api/search`.
pub fn search_routes(state: &AppState) -> Router<AppState> {
    let search_limit = RateLimitState::new(state.rate_limiter.clone(), RateLimitClass::Search);

    Router::new()
        .route("/flights", get(search_flights))
        .route("/accommodations", get(search_accommodations))
        .route("/events", get(search_places))
        .route_layer(middleware::from_fn_with_state(search_limit, rate_limit_middleware))
}
