//! Mock payment provider for testing.
//!
//! Configurable stand-in for `PaymentProvider`:
//! - subscriptions served from a map by id
//! - error injection per method
//! - call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::billing::SubscriptionSnapshot;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreateCustomerRequest, Customer, PaymentError,
    PaymentProvider, PortalSession,
};

#[derive(Default, Clone)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    subscriptions: HashMap<String, SubscriptionSnapshot>,
    method_errors: HashMap<String, PaymentError>,
    call_log: Vec<MethodCall>,
    customers_created: u32,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration
    // ════════════════════════════════════════════════════════════════════════════

    /// Serves `snapshot` from `retrieve_subscription`.
    pub fn add_subscription(&self, snapshot: SubscriptionSnapshot) {
        let mut state = self.state();
        state
            .subscriptions
            .insert(snapshot.stripe_subscription_id.clone(), snapshot);
    }

    /// Makes every call to `method` fail with `error`.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state()
            .method_errors
            .insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        self.state().method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    fn record(&self, method: &str, args: Vec<String>) -> Result<(), PaymentError> {
        let mut state = self.state();
        state.call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
        match state.method_errors.get(method) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_customer(&self, request: CreateCustomerRequest) -> Result<Customer, PaymentError> {
        self.record(
            "create_customer",
            vec![request.user_id.to_string(), request.email.clone()],
        )?;
        let mut state = self.state();
        state.customers_created += 1;
        Ok(Customer {
            id: format!("cus_mock_{}", state.customers_created),
            email: Some(request.email),
        })
    }

    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record(
            "create_checkout_session",
            vec![request.customer_id.clone(), request.price_id.clone()],
        )?;
        let id = format!("cs_mock_{}", request.customer_id);
        Ok(CheckoutSession {
            url: Some(format!("https://checkout.stripe.com/c/pay/{}", id)),
            id,
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        self.record(
            "create_portal_session",
            vec![customer_id.to_string(), return_url.to_string()],
        )?;
        Ok(PortalSession {
            id: format!("bps_mock_{}", customer_id),
            url: format!("https://billing.stripe.com/p/session/{}", customer_id),
        })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<SubscriptionSnapshot, PaymentError> {
        self.record("retrieve_subscription", vec![subscription_id.to_string()])?;
        self.state()
            .subscriptions
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("Subscription").with_status(404))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use crate::ports::PaymentErrorCode;

    #[tokio::test]
    async fn unknown_subscription_is_not_found() {
        let mock = MockPaymentProvider::new();
        let err = mock.retrieve_subscription("sub_x").await.unwrap_err();
        assert_eq!(err.code, PaymentErrorCode::NotFound);
        assert_eq!(mock.call_count("retrieve_subscription"), 1);
    }

    #[tokio::test]
    async fn injected_error_is_returned() {
        let mock = MockPaymentProvider::new();
        mock.set_method_error("create_customer", PaymentError::network("down"));

        let result = mock
            .create_customer(CreateCustomerRequest {
                user_id: UserId::new(),
                email: "a@x.com".into(),
                name: None,
            })
            .await;
        assert!(result.is_err());

        mock.clear_errors();
        let customer = mock
            .create_customer(CreateCustomerRequest {
                user_id: UserId::new(),
                email: "a@x.com".into(),
                name: None,
            })
            .await
            .unwrap();
        assert_eq!(customer.id, "cus_mock_1");
    }
}
