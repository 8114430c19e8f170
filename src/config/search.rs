//! Travel search provider configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// RapidAPI-hosted search providers.
///
/// One key is shared by the flight, accommodation and places hosts.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// RapidAPI subscription key
    pub rapidapi_key: String,

    /// Kiwi flights host
    #[serde(default = "default_flight_host")]
    pub flight_host: String,

    /// Airbnb host
    #[serde(default = "default_accommodation_host")]
    pub accommodation_host: String,

    /// Google Places host
    #[serde(default = "default_places_host")]
    pub places_host: String,

    /// Outbound request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl SearchConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate search configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.rapidapi_key.is_empty() {
            return Err(ValidationError::MissingRequired("RAPIDAPI_KEY"));
        }
        if self.flight_host.is_empty()
            || self.accommodation_host.is_empty()
            || self.places_host.is_empty()
        {
            return Err(ValidationError::MissingRequired("SEARCH_HOST"));
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            rapidapi_key: String::new(),
            flight_host: default_flight_host(),
            accommodation_host: default_accommodation_host(),
            places_host: default_places_host(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_flight_host() -> String {
    "kiwi-com-cheap-flights.p.rapidapi.com".to_string()
}

fn default_accommodation_host() -> String {
    "airbnb19.p.rapidapi.com".to_string()
}

fn default_places_host() -> String {
    "google-map-places-new-v2.p.rapidapi.com".to_string()
}

fn default_request_timeout() -> u64 {
    15
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_config_defaults() {
        let config = SearchConfig::default();
        assert_eq!(config.flight_host, "kiwi-com-cheap-flights.p.rapidapi.com");
        assert_eq!(config.accommodation_host, "airbnb19.p.rapidapi.com");
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_validation_missing_key() {
        let config = SearchConfig::default();
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("RAPIDAPI_KEY"))
        );
    }

    #[test]
    fn test_validation_empty_host() {
        let config = SearchConfig {
            rapidapi_key: "key".to_string(),
            places_host: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_valid_config() {
        let config = SearchConfig {
            rapidapi_key: "key".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
