//! Rate limiting middleware for axum.
//!
//! One layer per route class; each counts against its own budget, keyed by
//! client IP. Status is reported in standard headers:
//! - `X-RateLimit-Limit`: maximum requests allowed in the window
//! - `X-RateLimit-Remaining`: requests remaining in the current window
//! - `X-RateLimit-Reset`: Unix timestamp when the window resets
//! - `Retry-After`: seconds to wait (only on 429 response)
//!
//! ```ignore
//! let search = RateLimitState::new(limiter, RateLimitClass::Search);
//! let app = Router::new()
//!     .route("/flights", get(flights))
//!     .layer(middleware::from_fn_with_state(search, rate_limit_middleware));
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::ports::{RateLimitClass, RateLimitDenied, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter};

/// Standard rate limit header names.
pub mod headers {
    use super::HeaderName;

    pub static X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
    pub static X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
    pub static X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
}

/// Client key used when neither proxy headers nor the socket address are known.
const UNKNOWN_CLIENT: &str = "unknown";

/// Limiter plus the class whose budget this layer spends.
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<dyn RateLimiter>,
    pub class: RateLimitClass,
}

impl RateLimitState {
    pub fn new(limiter: Arc<dyn RateLimiter>, class: RateLimitClass) -> Self {
        Self { limiter, class }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DeniedBody {
    error: &'static str,
    retry_after: u32,
}

/// Counts the request against `state.class` for the caller's IP.
///
/// A limiter failure lets the request through.
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_ip(request.headers(), connect_info.as_ref())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string());
    let key = RateLimitKey::new(state.class, client);

    let status = match state.limiter.check(&key).await {
        Ok(RateLimitResult::Allowed(status)) => Some(status),
        Ok(RateLimitResult::Denied(denied)) => {
            tracing::info!(
                class = %state.class,
                client = %key.client,
                retry_after_secs = denied.retry_after_secs,
                "Rate limit exceeded"
            );
            return denied_response(&denied);
        }
        Err(e) => {
            tracing::warn!(class = %state.class, error = %e, "Rate limiter unavailable");
            None
        }
    };

    let mut response = next.run(request).await;
    if let Some(status) = status {
        add_rate_limit_headers(response.headers_mut(), &status);
    }
    response
}

/// Extract the client IP, checking forwarded headers first.
///
/// Order of precedence:
/// 1. X-Forwarded-For header (first IP in list)
/// 2. X-Real-IP header
/// 3. ConnectInfo socket address
pub fn client_ip(headers: &HeaderMap, connect_info: Option<&ConnectInfo<SocketAddr>>) -> Option<String> {
    let forwarded = headers
        .get("X-Forwarded-For")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = forwarded {
        return Some(ip.to_string());
    }

    let real = headers
        .get("X-Real-IP")
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|ip| !ip.is_empty());
    if let Some(ip) = real {
        return Some(ip.to_string());
    }

    connect_info.map(|ci| ci.0.ip().to_string())
}

fn denied_response(denied: &RateLimitDenied) -> Response {
    let mut response = (
        StatusCode::TOO_MANY_REQUESTS,
        Json(DeniedBody {
            error: denied.class.denial_message(),
            retry_after: denied.retry_after_secs,
        }),
    )
        .into_response();

    let headers = response.headers_mut();
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(denied.limit));
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(0u32));
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from(denied.reset_at.as_unix_secs()),
    );
    headers.insert(RETRY_AFTER, HeaderValue::from(denied.retry_after_secs));
    response
}

fn add_rate_limit_headers(headers: &mut HeaderMap, status: &RateLimitStatus) {
    headers.insert(headers::X_RATELIMIT_LIMIT.clone(), HeaderValue::from(status.limit));
    headers.insert(headers::X_RATELIMIT_REMAINING.clone(), HeaderValue::from(status.remaining));
    headers.insert(
        headers::X_RATELIMIT_RESET.clone(),
        HeaderValue::from(status.reset_at.as_unix_secs()),
    );
}
