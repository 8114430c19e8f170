//! Trips and the search results saved to them.

mod aggregate;
mod details;
mod saved_items;

pub use aggregate::Trip;
pub use details::{TripDetails, TripDraft, TripUpdate};
pub use saved_items::{
    AccommodationInput, ActivityInput, FlightInput, SavedAccommodation, SavedActivity, SavedFlight,
};
