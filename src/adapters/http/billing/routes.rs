//! Axum router for billing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use crate::adapters::http::state::AppState;

use super::handlers::{
    create_checkout_session, create_portal_session, my_subscription, premium_feature,
    stripe_webhook,
};

/// Routes mounted at `/api/subscriptions`.
pub fn billing_routes() -> Router<AppState> {
    Router::new()
        .route("/create-checkout-session", post(create_checkout_session))
        .route("/webhook", post(stripe_webhook))
        .route("/create-customer-portal-session", post(create_portal_session))
        .route("/my-subscription", get(my_subscription))
        .route("/premium-feature", get(premium_feature))
}
