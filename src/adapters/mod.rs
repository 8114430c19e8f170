//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - bcrypt password hashing and JWT bearer tokens
//! - `http` - the axum REST API
//! - `memory` - in-process repositories for tests and local runs
//! - `postgres` - sqlx repositories
//! - `rate_limiter` - in-memory and Redis fixed-window counters
//! - `search` - RapidAPI flight, accommodation and place clients
//! - `stripe` - payment processor client plus a recording mock

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod rate_limiter;
pub mod search;
pub mod stripe;
