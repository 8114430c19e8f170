//! Stripe REST adapter.
//!
//! Form-encoded requests against the Stripe API with the secret key as
//! basic-auth user. Webhook verification lives in `domain::billing`; this
//! adapter only makes outbound calls.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::PaymentConfig;
use crate::domain::billing::{StripeSubscription, SubscriptionSnapshot};
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentErrorCode, PaymentProvider, PortalSession,
};

const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    api_key: SecretString,
    api_base_url: String,
}

impl StripeConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    pub fn from_payment_config(config: &PaymentConfig) -> Self {
        let base = Self::new(config.stripe_secret_key.clone());
        match &config.stripe_api_base_url {
            Some(url) => base.with_base_url(url.clone()),
            None => base,
        }
    }

    /// Points the adapter at another host (tests use a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

impl std::fmt::Debug for StripeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StripeConfig")
            .field("api_base_url", &self.api_base_url)
            .finish_non_exhaustive()
    }
}

/// Stripe's error envelope: `{"error": {"message": .., "code": ..}}`.
#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    message: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomer {
    id: String,
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeCheckoutSessionCreated {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripePortalSession {
    id: String,
    url: String,
}

#[derive(Debug)]
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    pub fn new(config: StripeConfig) -> Result<Self, PaymentError> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaymentError::network(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            config,
            http_client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, PaymentError> {
        let response = self
            .http_client
            .post(self.url(path))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;
        Self::read(path, response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, PaymentError> {
        let response = self
            .http_client
            .get(self.url(path))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;
        Self::read(path, response).await
    }

    async fn read<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> Result<T, PaymentError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = error_from_body(status.as_u16(), &body);
            tracing::error!(
                path,
                status = status.as_u16(),
                code = error.provider_code.as_deref().unwrap_or(""),
                error = %error.message,
                "Stripe request failed"
            );
            return Err(error);
        }

        response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe response: {}", e),
            )
        })
    }
}

fn error_from_body(status: u16, body: &str) -> PaymentError {
    let code = PaymentErrorCode::from_status(status);
    match serde_json::from_str::<StripeErrorBody>(body) {
        Ok(parsed) => {
            let message = parsed
                .error
                .message
                .unwrap_or_else(|| format!("Stripe returned {}", status));
            let error = PaymentError::new(code, message).with_status(status);
            match parsed.error.code {
                Some(provider_code) => error.with_provider_code(provider_code),
                None => error,
            }
        }
        Err(_) => PaymentError::new(code, format!("Stripe returned {}", status)).with_status(status),
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer, PaymentError> {
        let mut params = vec![
            ("email", request.email.clone()),
            ("metadata[userId]", request.user_id.to_string()),
        ];
        if let Some(name) = &request.name {
            params.push(("name", name.clone()));
        }

        let customer: StripeCustomer = self.post_form("/v1/customers", &params).await?;
        tracing::info!(user_id = %request.user_id, customer_id = %customer.id, "Created Stripe customer");

        Ok(Customer {
            id: customer.id,
            email: customer.email.or(Some(request.email)),
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let params = vec![
            ("payment_method_types[0]", "card".to_string()),
            ("mode", "subscription".to_string()),
            ("customer", request.customer_id),
            ("line_items[0][price]", request.price_id),
            ("line_items[0][quantity]", "1".to_string()),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            ("client_reference_id", request.user_id.to_string()),
            ("metadata[userId]", request.user_id.to_string()),
        ];

        let session: StripeCheckoutSessionCreated =
            self.post_form("/v1/checkout/sessions", &params).await?;

        Ok(CheckoutSession {
            id: session.id,
            url: session.url,
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        let params = vec![
            ("customer", customer_id.to_string()),
            ("return_url", return_url.to_string()),
        ];
        let portal: StripePortalSession = self.post_form("/v1/billing_portal/sessions", &params).await?;

        Ok(PortalSession {
            id: portal.id,
            url: portal.url,
        })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionSnapshot, PaymentError> {
        let subscription: StripeSubscription = self
            .get(&format!("/v1/subscriptions/{}", subscription_id))
            .await?;

        subscription
            .to_snapshot()
            .map_err(|e| PaymentError::new(PaymentErrorCode::ProviderError, e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::SubscriptionStatus;
    use crate::domain::foundation::UserId;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn adapter(server: &MockServer) -> StripePaymentAdapter {
        StripePaymentAdapter::new(StripeConfig::new("sk_test_123").with_base_url(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn create_customer_sends_user_id_metadata() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/customers"))
            .and(header_exists("authorization"))
            .and(body_string_contains("metadata%5BuserId%5D"))
            .and(body_string_contains("email=a%40x.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cus_123",
                "email": "a@x.com"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let customer = adapter(&server)
            .await
            .create_customer(CreateCustomerRequest {
                user_id: UserId::new(),
                email: "a@x.com".into(),
                name: Some("alice".into()),
            })
            .await
            .unwrap();

        assert_eq!(customer.id, "cus_123");
    }

    #[tokio::test]
    async fn checkout_session_is_a_subscription_for_the_customer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/checkout/sessions"))
            .and(body_string_contains("mode=subscription"))
            .and(body_string_contains("customer=cus_123"))
            .and(body_string_contains("price_abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "cs_test_1",
                "url": "https://checkout.stripe.com/c/pay/cs_test_1"
            })))
            .mount(&server)
            .await;

        let session = adapter(&server)
            .await
            .create_checkout_session(CreateCheckoutRequest {
                user_id: UserId::new(),
                customer_id: "cus_123".into(),
                price_id: "price_abc".into(),
                success_url: "https://app/success".into(),
                cancel_url: "https://app/cancel".into(),
            })
            .await
            .unwrap();

        assert_eq!(session.id, "cs_test_1");
        assert!(session.url.unwrap().contains("cs_test_1"));
    }

    #[tokio::test]
    async fn retrieve_subscription_maps_to_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/subscriptions/sub_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "sub_1",
                "customer": "cus_123",
                "status": "active",
                "items": { "data": [ { "price": { "id": "price_abc" } } ] },
                "current_period_start": 1_700_000_000,
                "current_period_end": 1_702_592_000,
                "cancel_at_period_end": false
            })))
            .mount(&server)
            .await;

        let snapshot = adapter(&server).await.retrieve_subscription("sub_1").await.unwrap();
        assert_eq!(snapshot.status, SubscriptionStatus::Active);
        assert_eq!(snapshot.stripe_price_id.as_deref(), Some("price_abc"));
        assert_eq!(
            snapshot.current_period_end.map(|t| t.as_unix_secs()),
            Some(1_702_592_000)
        );
    }

    #[tokio::test]
    async fn stripe_errors_keep_status_and_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/subscriptions/sub_missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": {
                    "message": "No such subscription: 'sub_missing'",
                    "code": "resource_missing",
                    "type": "invalid_request_error"
                }
            })))
            .mount(&server)
            .await;

        let err = adapter(&server)
            .await
            .retrieve_subscription("sub_missing")
            .await
            .unwrap_err();

        assert_eq!(err.code, PaymentErrorCode::NotFound);
        assert_eq!(err.status, Some(404));
        assert_eq!(err.provider_code.as_deref(), Some("resource_missing"));
        assert!(err.message.contains("sub_missing"));
    }

    #[test]
    fn unparseable_error_body_still_maps_status() {
        let err = error_from_body(502, "<html>bad gateway</html>");
        assert_eq!(err.code, PaymentErrorCode::ProviderError);
        assert_eq!(err.message, "Stripe returned 502");
    }
}
