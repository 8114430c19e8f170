//! Webhook event envelope and the processor objects we read from it.
//!
//! Only the fields the reconciler needs are captured; everything else in
//! the processor's schema is ignored on deserialization.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::foundation::Timestamp;

use super::{SubscriptionSnapshot, SubscriptionStatus, WebhookError};

/// Webhook event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// `evt_...`
    pub id: String,

    #[serde(rename = "type")]
    pub event_type: String,

    pub created: i64,

    pub data: StripeEventData,

    #[serde(default)]
    pub livemode: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event; its shape depends on `type`.
    pub object: serde_json::Value,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Deserializes the data object as `T`.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(&self) -> Result<T, WebhookError> {
        serde_json::from_value(self.data.object.clone()).map_err(|e| {
            WebhookError::ParseError(format!("{} payload: {}", self.event_type, e))
        })
    }
}

// ════════════════════════════════════════════════════════════════════
// Processor objects
// ════════════════════════════════════════════════════════════════════

/// Paginated list wrapper used for nested collections.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeList<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

// Written out so an absent list does not require `T: Default`.
impl<T> Default for StripeList<T> {
    fn default() -> Self {
        Self { data: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    pub customer: Option<String>,
    pub subscription: Option<String>,
    pub client_reference_id: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePrice {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscriptionItem {
    pub price: Option<StripePrice>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscription {
    pub id: String,
    pub customer: Option<String>,
    pub status: String,
    #[serde(default)]
    pub items: StripeList<StripeSubscriptionItem>,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub cancel_at_period_end: bool,
    pub trial_start: Option<i64>,
    pub trial_end: Option<i64>,
    pub ended_at: Option<i64>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StripeSubscription {
    pub fn price_id(&self) -> Option<&str> {
        self.items
            .data
            .first()
            .and_then(|item| item.price.as_ref())
            .map(|price| price.id.as_str())
    }

    /// Converts to the local snapshot; fails on a status we do not model.
    pub fn to_snapshot(&self) -> Result<SubscriptionSnapshot, WebhookError> {
        let status: SubscriptionStatus = self
            .status
            .parse()
            .map_err(|e: super::status::UnknownStatus| WebhookError::ParseError(e.to_string()))?;

        Ok(SubscriptionSnapshot {
            stripe_subscription_id: self.id.clone(),
            stripe_price_id: self.price_id().map(str::to_string),
            status,
            current_period_start: self.current_period_start.and_then(Timestamp::from_unix_secs),
            current_period_end: self.current_period_end.and_then(Timestamp::from_unix_secs),
            cancel_at_period_end: self.cancel_at_period_end,
            trial_start: self.trial_start.and_then(Timestamp::from_unix_secs),
            trial_end: self.trial_end.and_then(Timestamp::from_unix_secs),
            ended_at: self.ended_at.and_then(Timestamp::from_unix_secs),
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePeriod {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeInvoiceLine {
    pub period: Option<StripePeriod>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeInvoice {
    pub id: String,
    pub customer: Option<String>,
    pub subscription: Option<String>,
    #[serde(default)]
    pub lines: StripeList<StripeInvoiceLine>,
    pub next_payment_attempt: Option<i64>,
}

impl StripeInvoice {
    /// Billing period of the first line item.
    pub fn period(&self) -> (Option<Timestamp>, Option<Timestamp>) {
        match self.lines.data.first().and_then(|line| line.period.as_ref()) {
            Some(period) => (
                period.start.and_then(Timestamp::from_unix_secs),
                period.end.and_then(Timestamp::from_unix_secs),
            ),
            None => (None, None),
        }
    }
}

/// Builder for webhook events in tests.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: self.livemode,
            api_version: Some("2023-10-16".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserialize_minimal_event_without_api_version() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "checkout.session.completed",
            "created": 1704067200,
            "data": { "object": {} }
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert!(!event.is_live());
        assert!(event.api_version.is_none());
    }

    #[test]
    fn subscription_object_converts_to_snapshot() {
        let event = StripeEventBuilder::new()
            .event_type("customer.subscription.updated")
            .object(json!({
                "id": "sub_123",
                "customer": "cus_1",
                "status": "trialing",
                "items": { "data": [ { "price": { "id": "price_monthly" } } ] },
                "current_period_start": 1700000000,
                "current_period_end": 1702592000,
                "cancel_at_period_end": true,
                "trial_start": 1700000000,
                "trial_end": 1700604800,
                "ended_at": null
            }))
            .build();

        let sub: StripeSubscription = event.deserialize_object().unwrap();
        let snapshot = sub.to_snapshot().unwrap();

        assert_eq!(snapshot.stripe_subscription_id, "sub_123");
        assert_eq!(snapshot.stripe_price_id.as_deref(), Some("price_monthly"));
        assert_eq!(snapshot.status, SubscriptionStatus::Trialing);
        assert!(snapshot.cancel_at_period_end);
        assert_eq!(snapshot.trial_end.map(|t| t.as_unix_secs()), Some(1700604800));
        assert!(snapshot.ended_at.is_none());
    }

    #[test]
    fn unknown_subscription_status_is_parse_error() {
        let sub: StripeSubscription = serde_json::from_value(json!({
            "id": "sub_1",
            "status": "paused"
        }))
        .unwrap();

        assert!(matches!(sub.to_snapshot(), Err(WebhookError::ParseError(_))));
    }

    #[test]
    fn invoice_period_reads_first_line() {
        let invoice: StripeInvoice = serde_json::from_value(json!({
            "id": "in_1",
            "subscription": "sub_1",
            "lines": { "data": [ { "period": { "start": 1700000000, "end": 1702592000 } } ] }
        }))
        .unwrap();

        let (start, end) = invoice.period();
        assert_eq!(start.map(|t| t.as_unix_secs()), Some(1700000000));
        assert_eq!(end.map(|t| t.as_unix_secs()), Some(1702592000));
    }

    #[test]
    fn absent_nested_lists_default_to_empty() {
        let sub: StripeSubscription = serde_json::from_value(json!({
            "id": "sub_1",
            "status": "active"
        }))
        .unwrap();
        let invoice: StripeInvoice = serde_json::from_value(json!({ "id": "in_1" })).unwrap();

        assert!(sub.price_id().is_none());
        assert!(sub.items.data.is_empty());
        assert_eq!(invoice.period(), (None, None));
    }

    #[test]
    fn wrong_object_shape_is_parse_error() {
        let event = StripeEventBuilder::new()
            .object(json!({ "status": "complete" }))
            .build();

        let result: Result<StripeCheckoutSession, _> = event.deserialize_object();
        assert!(matches!(result, Err(WebhookError::ParseError(_))));
    }
}
