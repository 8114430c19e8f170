//! Rate limit configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Per-IP request budgets for the three route classes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Every route
    #[serde(default = "WindowLimit::general")]
    pub general: WindowLimit,

    /// Register and login
    #[serde(default = "WindowLimit::auth")]
    pub auth: WindowLimit,

    /// Travel search proxy
    #[serde(default = "WindowLimit::search")]
    pub search: WindowLimit,
}

/// A fixed-window budget.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct WindowLimit {
    pub max_requests: u32,
    pub window_secs: u32,
}

impl WindowLimit {
    pub fn general() -> Self {
        Self {
            max_requests: 100,
            window_secs: 15 * 60,
        }
    }

    pub fn auth() -> Self {
        Self {
            max_requests: 5,
            window_secs: 15 * 60,
        }
    }

    pub fn search() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
        }
    }

    fn validate(&self, name: &'static str) -> Result<(), ValidationError> {
        if self.max_requests == 0 || self.window_secs == 0 {
            return Err(ValidationError::InvalidRateLimit(name));
        }
        Ok(())
    }
}

impl RateLimitConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.general.validate("general")?;
        self.auth.validate("auth")?;
        self.search.validate("search")?;
        Ok(())
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            general: WindowLimit::general(),
            auth: WindowLimit::auth(),
            search: WindowLimit::search(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_budgets() {
        let config = RateLimitConfig::default();
        assert_eq!(config.general.max_requests, 100);
        assert_eq!(config.general.window_secs, 900);
        assert_eq!(config.auth.max_requests, 5);
        assert_eq!(config.search.max_requests, 10);
        assert_eq!(config.search.window_secs, 60);
    }

    #[test]
    fn zero_window_is_rejected() {
        let config = RateLimitConfig {
            search: WindowLimit {
                max_requests: 10,
                window_secs: 0,
            },
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::InvalidRateLimit("search"))
        );
    }

    #[test]
    fn default_config_is_valid() {
        assert!(RateLimitConfig::default().validate().is_ok());
    }
}
