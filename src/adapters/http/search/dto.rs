//! Query strings for search endpoints.
//!
//! Every field is taken as text; the search domain decides what is valid.

use serde::Deserialize;

use crate::domain::search::{AccommodationParams, FlightParams};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSearchQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure_date: Option<String>,
    pub return_date: Option<String>,
    pub adults: Option<String>,
    pub children: Option<String>,
    pub infants: Option<String>,
    pub max_stopovers: Option<String>,
    pub sort_by: Option<String>,
}

impl From<FlightSearchQuery> for FlightParams {
    fn from(q: FlightSearchQuery) -> Self {
        FlightParams {
            origin: q.origin,
            destination: q.destination,
            departure_date: q.departure_date,
            return_date: q.return_date,
            adults: q.adults,
            children: q.children,
            infants: q.infants,
            max_stopovers: q.max_stopovers,
            sort_by: q.sort_by,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccommodationSearchQuery {
    pub destination_city: Option<String>,
    pub check_in_date: Option<String>,
    pub check_out_date: Option<String>,
    pub adults: Option<String>,
    pub children: Option<String>,
    pub infants: Option<String>,
    pub currency: Option<String>,
    pub price_min: Option<String>,
    pub price_max: Option<String>,
    pub min_bedrooms: Option<String>,
    pub amenities: Option<String>,
}

impl From<AccommodationSearchQuery> for AccommodationParams {
    fn from(q: AccommodationSearchQuery) -> Self {
        AccommodationParams {
            destination_city: q.destination_city,
            check_in_date: q.check_in_date,
            check_out_date: q.check_out_date,
            adults: q.adults,
            children: q.children,
            infants: q.infants,
            currency: q.currency,
            price_min: q.price_min,
            price_max: q.price_max,
            min_bedrooms: q.min_bedrooms,
            amenities: q.amenities,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSearchQuery {
    pub destination_city: Option<String>,
    pub search_term: Option<String>,
}
