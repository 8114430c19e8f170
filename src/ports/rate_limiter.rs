//! Rate limiting port.
//!
//! Fixed-window counters keyed by client IP and route class. The in-memory
//! adapter serves single-process deployments and tests; the Redis adapter
//! shares counters across processes.

use async_trait::async_trait;
use std::fmt;

use crate::config::{RateLimitConfig, WindowLimit};
use crate::domain::foundation::Timestamp;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Counts the request and reports whether it is within budget.
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitResult, RateLimitError>;
}

/// Route class with its own budget.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum RateLimitClass {
    /// Every route.
    General,
    /// Register and login.
    Auth,
    /// External search proxy.
    Search,
}

impl RateLimitClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateLimitClass::General => "general",
            RateLimitClass::Auth => "auth",
            RateLimitClass::Search => "search",
        }
    }

    pub fn limit_in(&self, config: &RateLimitConfig) -> WindowLimit {
        match self {
            RateLimitClass::General => config.general,
            RateLimitClass::Auth => config.auth,
            RateLimitClass::Search => config.search,
        }
    }

    /// Message returned with a 429.
    pub fn denial_message(&self) -> &'static str {
        match self {
            RateLimitClass::General => "Too many requests from this IP, please try again later.",
            RateLimitClass::Auth => {
                "Too many authentication attempts from this IP, please try again after 15 minutes."
            }
            RateLimitClass::Search => "Too many search requests, please try again in a minute.",
        }
    }
}

impl fmt::Display for RateLimitClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub class: RateLimitClass,
    /// Client IP address.
    pub client: String,
}

impl RateLimitKey {
    pub fn new(class: RateLimitClass, client: impl Into<String>) -> Self {
        Self {
            class,
            client: client.into(),
        }
    }

    /// Storage key, e.g. `ratelimit:search:10.0.0.1`.
    pub fn storage_key(&self) -> String {
        format!("ratelimit:{}:{}", self.class.as_str(), self.client)
    }
}

#[derive(Debug, Clone)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    pub reset_at: Timestamp,
    pub window_secs: u32,
}

#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    pub limit: u32,
    pub retry_after_secs: u32,
    pub reset_at: Timestamp,
    pub class: RateLimitClass,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),
}
