//! SearchTravelHandler - validates queries and forwards them upstream.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::AppError;
use crate::domain::search::{
    AccommodationOffer, AccommodationParams, AccommodationQuery, FlightOffer, FlightParams,
    FlightQuery, PlaceQuery, PlaceResult,
};
use crate::ports::{AccommodationSearch, FlightSearch, PlaceSearch, SearchError};

/// One entry point per search kind. Results are never cached.
pub struct SearchTravelHandler {
    flights: Arc<dyn FlightSearch>,
    accommodations: Arc<dyn AccommodationSearch>,
    places: Arc<dyn PlaceSearch>,
}

impl SearchTravelHandler {
    pub fn new(
        flights: Arc<dyn FlightSearch>,
        accommodations: Arc<dyn AccommodationSearch>,
        places: Arc<dyn PlaceSearch>,
    ) -> Self {
        Self {
            flights,
            accommodations,
            places,
        }
    }

    pub async fn flights(&self, params: FlightParams) -> Result<Vec<FlightOffer>, AppError> {
        let query = FlightQuery::try_from(params)?;
        let offers = self
            .flights
            .search_flights(&query)
            .await
            .map_err(log_upstream)?;
        info!(
            origin = %query.origin,
            destination = %query.destination,
            round_trip = query.is_round_trip(),
            results = offers.len(),
            "Flight search completed"
        );
        Ok(offers)
    }

    pub async fn accommodations(
        &self,
        params: AccommodationParams,
    ) -> Result<Vec<AccommodationOffer>, AppError> {
        let query = AccommodationQuery::try_from(params)?;
        let offers = self
            .accommodations
            .search_accommodations(&query)
            .await
            .map_err(log_upstream)?;
        info!(
            city = %query.destination_city,
            results = offers.len(),
            "Accommodation search completed"
        );
        Ok(offers)
    }

    pub async fn places(
        &self,
        destination_city: Option<String>,
        search_term: Option<String>,
    ) -> Result<Vec<PlaceResult>, AppError> {
        let query = PlaceQuery::new(destination_city, search_term)?;
        let results = self.places.search_places(&query).await.map_err(log_upstream)?;
        info!(
            city = %query.destination_city,
            results = results.len(),
            "Place search completed"
        );
        Ok(results)
    }
}

fn log_upstream(err: SearchError) -> AppError {
    warn!(error = %err, "Upstream search failed");
    err.into()
}
