//! HTTP middleware for axum.
//!
//! - `auth` - bearer token resolution and the auth/premium extractors
//! - `rate_limit` - per-IP fixed-window limits by route class

pub mod auth;
pub mod rate_limit;

pub use auth::{auth_middleware, PremiumRejection, RequireAuth, RequirePremium};
pub use rate_limit::{client_ip, rate_limit_middleware, RateLimitState};
