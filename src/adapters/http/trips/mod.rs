//! HTTP adapter for trip endpoints. Every route requires authentication.
//!
//! - `POST /api/trips`, `GET /api/trips` - create, list own trips
//! - `GET|PUT|DELETE /api/trips/:tripId`
//! - `POST /api/trips/:tripId/flights`,
//!   `DELETE /api/trips/:tripId/flights/:flightApiId/:departureTimestamp`
//! - `POST /api/trips/:tripId/accommodations`,
//!   `DELETE /api/trips/:tripId/accommodations/:accommodationApiId/:checkInTimestamp`
//! - `POST /api/trips/:tripId/activities`,
//!   `DELETE /api/trips/:tripId/activities/:activityApiId`

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::trip_routes;
