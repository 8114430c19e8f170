//! Rate limiter adapters.
//!
//! - `InMemoryRateLimiter` - tests and single-process runs
//! - `RedisRateLimiter` - shared counters when `REDIS__URL` is configured

mod in_memory;
mod redis;

pub use in_memory::InMemoryRateLimiter;
pub use redis::RedisRateLimiter;
