//! Top-level router: every route group plus the cross-cutting layers.
//!
//! Layer order, outermost first:
//! request id → trace → propagate id → CORS → gzip → timeout
//! → general rate limit → bearer auth → route. Body size is capped where
//! extractors buffer it, via `DefaultBodyLimit`.

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::RateLimitClass;

use super::auth::auth_routes;
use super::billing::billing_routes;
use super::error::expose_error_detail;
use super::groups::group_routes;
use super::middleware::{auth_middleware, rate_limit_middleware, RateLimitState};
use super::posts::post_routes;
use super::referrals::referral_routes;
use super::search::search_routes;
use super::state::AppState;
use super::trips::trip_routes;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    environment: &'static str,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Timestamp::now().to_rfc3339(),
        environment: state.environment.as_str(),
    })
}

/// Every `/api` route group, without layers.
pub fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes(state))
        .nest("/trips", trip_routes())
        .nest("/search", search_routes(state))
        .nest("/subscriptions", billing_routes())
        .nest("/referrals", referral_routes())
        .nest("/posts", post_routes())
        .nest("/groups", group_routes())
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .client_origin_list()
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Builds the complete application.
pub fn build_router(state: AppState, server: &ServerConfig) -> Router {
    expose_error_detail(!server.is_production());

    let general_limit = RateLimitState::new(state.rate_limiter.clone(), RateLimitClass::General);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes(&state))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(middleware::from_fn_with_state(general_limit, rate_limit_middleware))
        .layer(DefaultBodyLimit::max(server.body_limit_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(server))
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(server.request_timeout())),
        )
        .with_state(state)
}
