//! Axum router for identity endpoints.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::adapters::http::middleware::{rate_limit_middleware, RateLimitState};
use crate::adapters::http::state::AppState;
use crate::ports::RateLimitClass;

use super::handlers::{login, me, public_profile, register, update_profile};

/// Routes mounted at `/api/auth`.
///
/// Register and login spend the auth budget on top of the general one.
pub fn auth_routes(state: &AppState) -> Router<AppState> {
    let auth_limit = RateLimitState::new(state.rate_limiter.clone(), RateLimitClass::Auth);

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route_layer(middleware::from_fn_with_state(auth_limit, rate_limit_middleware))
        .route("/me", get(me))
        .route("/profile", put(update_profile))
        .route("/users/:user_id/profile", get(public_profile))
}
