//! Shared rate limit store

use std::time::Duration;

use serde::Deserialize;

use super::error::ValidationError;

/// Redis holding rate limit counters shared by every API instance.
///
/// When the section is absent each process counts on its own.
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,

    /// Namespace for counter keys
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Startup gives up on Redis after this long and counts in memory
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl RedisConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.trim().is_empty() {
            return Err(ValidationError::MissingRequired("REDIS_URL"));
        }
        match self.url.split_once("://") {
            Some(("redis" | "rediss", _)) => Ok(()),
            _ => Err(ValidationError::InvalidRedisUrl),
        }
    }
}

fn default_key_prefix() -> String {
    "budget-backpack".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}
