//! External search providers reached through RapidAPI.

mod airbnb;
mod google_places;
mod kiwi;
mod rapidapi;

pub use airbnb::AirbnbAccommodationSearch;
pub use google_places::GooglePlacesSearch;
pub use kiwi::KiwiFlightSearch;
pub use rapidapi::{base_url, RapidApiClient};
