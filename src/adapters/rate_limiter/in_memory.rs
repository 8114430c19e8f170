//! In-memory rate limiter for tests and single-process deployments.
//!
//! Fixed-window counters in a HashMap. Counters are not shared between
//! processes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::RateLimitConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

#[derive(Debug, Clone)]
struct WindowState {
    count: u32,
    window_start: i64,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    async fn check_at(&self, key: &RateLimitKey, now: i64) -> RateLimitResult {
        let budget = key.class.limit_in(&self.config);
        let window_secs = i64::from(budget.window_secs);

        let mut windows = self.windows.write().await;
        let state = windows.entry(key.storage_key()).or_insert(WindowState {
            count: 0,
            window_start: now,
        });

        if now >= state.window_start + window_secs {
            state.count = 0;
            state.window_start = now;
        }

        let window_end = state.window_start + window_secs;
        let reset_at = Timestamp::from_unix_secs(window_end).unwrap_or_else(Timestamp::now);

        if state.count >= budget.max_requests {
            let retry_after = (window_end - now).max(1) as u32;
            return RateLimitResult::Denied(RateLimitDenied {
                limit: budget.max_requests,
                retry_after_secs: retry_after,
                reset_at,
                class: key.class,
            });
        }

        state.count += 1;
        RateLimitResult::Allowed(RateLimitStatus {
            limit: budget.max_requests,
            remaining: budget.max_requests.saturating_sub(state.count),
            reset_at,
            window_secs: budget.window_secs,
        })
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        Ok(self.check_at(key, Timestamp::now().as_unix_secs()).await)
    }
}
