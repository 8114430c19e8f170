//! Shared HTTP plumbing for RapidAPI-hosted providers.
//!
//! Every provider is called with the account key and its own host header.
//! Both come from configuration at construction; nothing is set on a
//! process-wide client.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::ports::{SearchError, SearchKind};

#[derive(Clone)]
pub struct RapidApiClient {
    http: reqwest::Client,
    api_key: SecretString,
}

impl RapidApiClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            api_key: SecretString::new(api_key.into()),
        })
    }

    /// Starts a request carrying the RapidAPI key and host headers.
    pub fn request(&self, method: reqwest::Method, url: &str, host: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, url)
            .header("X-RapidAPI-Key", self.api_key.expose_secret())
            .header("X-RapidAPI-Host", host)
    }

    /// Sends the request and returns the JSON body of a successful answer.
    pub async fn send(&self, kind: SearchKind, request: reqwest::RequestBuilder) -> Result<Value, SearchError> {
        let response = request.send().await.map_err(|e| transport_error(kind, e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| transport_error(kind, e))?;

        if !status.is_success() {
            let details = serde_json::from_str(&body).unwrap_or(Value::String(body));
            let message = upstream_message(&details)
                .unwrap_or_else(|| format!("Failed to fetch {} data", kind.label()));
            tracing::warn!(
                api = kind.label(),
                status = status.as_u16(),
                error = %message,
                "Search provider returned an error"
            );
            return Err(SearchError::Upstream {
                kind,
                status: status.as_u16(),
                message,
                details,
            });
        }

        serde_json::from_str(&body).map_err(|e| SearchError::Request {
            kind,
            message: format!("unreadable response: {}", e),
        })
    }
}

impl std::fmt::Debug for RapidApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RapidApiClient").finish_non_exhaustive()
    }
}

fn transport_error(kind: SearchKind, error: reqwest::Error) -> SearchError {
    if error.is_timeout() || error.is_connect() || error.is_request() {
        tracing::warn!(api = kind.label(), error = %error, "No response from search provider");
        SearchError::NoResponse { kind }
    } else {
        SearchError::Request {
            kind,
            message: error.to_string(),
        }
    }
}

/// `message`, or Google's nested `error.message`.
fn upstream_message(details: &Value) -> Option<String> {
    details
        .get("message")
        .or_else(|| details.get("error").and_then(|e| e.get("message")))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Reads a number that may be sent as a JSON number or a numeric string.
pub(crate) fn lenient_number(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// `https://{host}` unless a base URL override is given.
pub fn base_url(host: &str, override_url: Option<&str>) -> String {
    match override_url {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => format!("https://{}", host),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upstream_message_prefers_top_level() {
        assert_eq!(
            upstream_message(&json!({"message": "quota"})).as_deref(),
            Some("quota")
        );
        assert_eq!(
            upstream_message(&json!({"error": {"message": "bad key"}})).as_deref(),
            Some("bad key")
        );
        assert_eq!(upstream_message(&json!("plain text")), None);
    }

    #[test]
    fn numbers_may_arrive_as_strings() {
        assert_eq!(lenient_number(Some(&json!("129.5"))), Some(129.5));
        assert_eq!(lenient_number(Some(&json!(42))), Some(42.0));
        assert_eq!(lenient_number(Some(&json!("n/a"))), None);
        assert_eq!(lenient_number(None), None);
    }
}
