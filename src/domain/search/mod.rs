//! Search queries and normalised offers for the external search proxy.

mod offers;
mod query;

pub use offers::{
    format_duration, AccommodationOffer, FlightOffer, HostSummary, PlaceResult, ReturnInfo,
    DURATION_NOT_AVAILABLE, NOT_AVAILABLE, UNKNOWN_AIRLINE, UNKNOWN_AIRPORT, UNKNOWN_CITY,
};
pub use query::{
    AccommodationParams, AccommodationQuery, FlightParams, FlightQuery, FlightSort, Passengers,
    PlaceQuery, SearchQueryError, MAX_ACCOMMODATION_ADULTS, MAX_FLIGHT_ADULTS,
};
