//! Redis-backed rate limiter for multi-process deployments.
//!
//! Fixed window with `INCR` + `EXPIRE`: the first hit in a window sets the
//! expiry, and the key's TTL tells clients when to retry.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::config::RateLimitConfig;
use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: MultiplexedConnection,
    config: RateLimitConfig,
    key_prefix: String,
}

impl RedisRateLimiter {
    pub fn new(conn: MultiplexedConnection, config: RateLimitConfig, key_prefix: impl Into<String>) -> Self {
        Self {
            conn,
            config,
            key_prefix: key_prefix.into(),
        }
    }

    /// Connects using a `redis://` URL.
    pub async fn connect(
        url: &str,
        config: RateLimitConfig,
        key_prefix: impl Into<String>,
    ) -> Result<Self, RateLimitError> {
        let client = redis::Client::open(url).map_err(unavailable)?;
        let conn = client
            .get_multiplexed_tokio_connection()
            .await
            .map_err(unavailable)?;
        Ok(Self::new(conn, config, key_prefix))
    }

    fn redis_key(&self, key: &RateLimitKey) -> String {
        format!("{}:{}", self.key_prefix, key.storage_key())
    }
}

fn unavailable(e: redis::RedisError) -> RateLimitError {
    RateLimitError::Unavailable(e.to_string())
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn check(&self, key: &RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let redis_key = self.redis_key(key);
        let budget = key.class.limit_in(&self.config);
        let mut conn = self.conn.clone();

        let count: i64 = conn.incr(&redis_key, 1_i64).await.map_err(unavailable)?;
        if count == 1 {
            conn.expire::<_, ()>(&redis_key, i64::from(budget.window_secs))
                .await
                .map_err(unavailable)?;
        }

        let ttl: i64 = conn.ttl(&redis_key).await.map_err(unavailable)?;
        let reset_secs = if ttl > 0 { ttl } else { i64::from(budget.window_secs) };
        let reset_at = Timestamp::now().add_seconds(reset_secs);

        if count > i64::from(budget.max_requests) {
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit: budget.max_requests,
                retry_after_secs: reset_secs.max(1) as u32,
                reset_at,
                class: key.class,
            }));
        }

        Ok(RateLimitResult::Allowed(RateLimitStatus {
            limit: budget.max_requests,
            remaining: budget.max_requests.saturating_sub(count as u32),
            reset_at,
            window_secs: budget.window_secs,
        }))
    }
}

impl std::fmt::Debug for RedisRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisRateLimiter")
            .field("config", &self.config)
            .field("key_prefix", &self.key_prefix)
            .finish_non_exhaustive()
    }
}
