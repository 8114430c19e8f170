//! HTTP adapter for the travel search proxy.
//!
//! - `GET /api/search/flights`
//! - `GET /api/search/accommodations`
//! - `GET /api/search/events`
//!
//! Authenticated and behind the search rate limit.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::search_routes;
