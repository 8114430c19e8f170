//! HTTP adapter for referral stats: `GET /api/referrals/my-stats`.

pub mod handlers;
pub mod routes;

pub use routes::referral_routes;
