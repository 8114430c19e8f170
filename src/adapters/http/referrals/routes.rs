//! Axum router for referral endpoints.

use axum::{routing::get, Router};

use crate::adapters::http::state::AppState;

use super::handlers::my_stats;

/// Routes mounted at `/api/referrals`.
pub fn referral_routes() -> Router<AppState> {
    Router::new().route("/my-stats", get(my_stats))
}
