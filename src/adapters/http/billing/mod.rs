//! HTTP adapter for subscription billing.
//!
//! - `POST /api/subscriptions/create-checkout-session` - start a paid checkout
//! - `POST /api/subscriptions/webhook` - processor events (signature verified, no auth)
//! - `POST /api/subscriptions/create-customer-portal-session` - self-service portal
//! - `GET /api/subscriptions/my-subscription` - tier and current subscription
//! - `GET /api/subscriptions/premium-feature` - premium-only sample endpoint

pub mod dto;
pub mod handlers;
pub mod routes;

pub use routes::billing_routes;
