//! Typed webhook events.
//!
//! A verified [`StripeEvent`] is parsed once into a [`BillingEvent`] whose
//! variants carry exactly what the reconciler needs. Payload problems
//! surface here as 400s, before any state is touched.

use crate::domain::foundation::{Timestamp, UserId};

use super::stripe_event::{StripeCheckoutSession, StripeEvent, StripeInvoice, StripeSubscription};
use super::{SubscriptionSnapshot, WebhookError};

pub const CHECKOUT_SESSION_COMPLETED: &str = "checkout.session.completed";
pub const SUBSCRIPTION_UPDATED: &str = "customer.subscription.updated";
pub const SUBSCRIPTION_DELETED: &str = "customer.subscription.deleted";
pub const INVOICE_PAYMENT_SUCCEEDED: &str = "invoice.payment_succeeded";
pub const INVOICE_PAYMENT_FAILED: &str = "invoice.payment_failed";

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutCompleted {
    pub session_id: String,
    pub user_id: UserId,
    pub customer_id: String,
    pub stripe_subscription_id: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionDeleted {
    pub stripe_subscription_id: String,
    pub ended_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoicePaid {
    pub invoice_id: String,
    pub stripe_subscription_id: String,
    pub period_start: Option<Timestamp>,
    pub period_end: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvoiceFailed {
    pub invoice_id: String,
    pub stripe_subscription_id: String,
    /// The processor scheduled another attempt.
    pub retry_scheduled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BillingEvent {
    CheckoutCompleted(CheckoutCompleted),
    SubscriptionUpdated(SubscriptionSnapshot),
    SubscriptionDeleted(SubscriptionDeleted),
    InvoicePaymentSucceeded(InvoicePaid),
    InvoicePaymentFailed(InvoiceFailed),
    /// Acknowledged and logged, nothing applied.
    Unhandled { event_type: String, reason: String },
}

impl BillingEvent {
    pub fn parse(event: &StripeEvent) -> Result<Self, WebhookError> {
        match event.event_type.as_str() {
            CHECKOUT_SESSION_COMPLETED => {
                let session: StripeCheckoutSession = event.deserialize_object()?;
                parse_checkout(session).map(BillingEvent::CheckoutCompleted)
            }
            SUBSCRIPTION_UPDATED => {
                let sub: StripeSubscription = event.deserialize_object()?;
                sub.to_snapshot().map(BillingEvent::SubscriptionUpdated)
            }
            SUBSCRIPTION_DELETED => {
                let sub: StripeSubscription = event.deserialize_object()?;
                Ok(BillingEvent::SubscriptionDeleted(SubscriptionDeleted {
                    ended_at: sub.ended_at.and_then(Timestamp::from_unix_secs),
                    stripe_subscription_id: sub.id,
                }))
            }
            INVOICE_PAYMENT_SUCCEEDED => {
                let invoice: StripeInvoice = event.deserialize_object()?;
                let (period_start, period_end) = invoice.period();
                Ok(match invoice.subscription {
                    Some(stripe_subscription_id) => {
                        BillingEvent::InvoicePaymentSucceeded(InvoicePaid {
                            invoice_id: invoice.id,
                            stripe_subscription_id,
                            period_start,
                            period_end,
                        })
                    }
                    None => not_subscription_invoice(event),
                })
            }
            INVOICE_PAYMENT_FAILED => {
                let invoice: StripeInvoice = event.deserialize_object()?;
                Ok(match invoice.subscription {
                    Some(stripe_subscription_id) => {
                        BillingEvent::InvoicePaymentFailed(InvoiceFailed {
                            invoice_id: invoice.id,
                            stripe_subscription_id,
                            retry_scheduled: invoice.next_payment_attempt.is_some(),
                        })
                    }
                    None => not_subscription_invoice(event),
                })
            }
            other => Ok(BillingEvent::Unhandled {
                event_type: other.to_string(),
                reason: "event type not handled".to_string(),
            }),
        }
    }

    /// Processor subscription id the event is about, if any.
    pub fn stripe_subscription_id(&self) -> Option<&str> {
        match self {
            BillingEvent::CheckoutCompleted(c) => Some(&c.stripe_subscription_id),
            BillingEvent::SubscriptionUpdated(s) => Some(&s.stripe_subscription_id),
            BillingEvent::SubscriptionDeleted(d) => Some(&d.stripe_subscription_id),
            BillingEvent::InvoicePaymentSucceeded(i) => Some(&i.stripe_subscription_id),
            BillingEvent::InvoicePaymentFailed(i) => Some(&i.stripe_subscription_id),
            BillingEvent::Unhandled { .. } => None,
        }
    }
}

fn not_subscription_invoice(event: &StripeEvent) -> BillingEvent {
    BillingEvent::Unhandled {
        event_type: event.event_type.clone(),
        reason: "invoice is not tied to a subscription".to_string(),
    }
}

fn parse_checkout(session: StripeCheckoutSession) -> Result<CheckoutCompleted, WebhookError> {
    let raw_user_id = session
        .metadata
        .get("userId")
        .or_else(|| session.metadata.get("user_id"))
        .cloned()
        .or(session.client_reference_id)
        .ok_or(WebhookError::MissingMetadata("userId"))?;
    let user_id = raw_user_id
        .parse::<UserId>()
        .map_err(|_| WebhookError::ParseError(format!("invalid userId metadata: {}", raw_user_id)))?;

    let customer_id = session
        .customer
        .filter(|c| !c.is_empty())
        .ok_or(WebhookError::MissingField("customer"))?;
    let stripe_subscription_id = session
        .subscription
        .filter(|s| !s.is_empty())
        .ok_or(WebhookError::MissingField("subscription"))?;

    Ok(CheckoutCompleted {
        session_id: session.id,
        user_id,
        customer_id,
        stripe_subscription_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::StripeEventBuilder;
    use crate::domain::billing::SubscriptionStatus;
    use serde_json::json;

    fn event(event_type: &str, object: serde_json::Value) -> StripeEvent {
        StripeEventBuilder::new()
            .event_type(event_type)
            .object(object)
            .build()
    }

    // ══════════════════════════════════════════════════════════════
    // Checkout
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn checkout_reads_user_id_from_metadata() {
        let user = UserId::new();
        let parsed = BillingEvent::parse(&event(
            CHECKOUT_SESSION_COMPLETED,
            json!({
                "id": "cs_1",
                "customer": "cus_1",
                "subscription": "sub_1",
                "metadata": { "userId": user.to_string() }
            }),
        ))
        .unwrap();

        assert_eq!(
            parsed,
            BillingEvent::CheckoutCompleted(CheckoutCompleted {
                session_id: "cs_1".into(),
                user_id: user,
                customer_id: "cus_1".into(),
                stripe_subscription_id: "sub_1".into(),
            })
        );
    }

    #[test]
    fn checkout_accepts_snake_case_metadata_key() {
        let user = UserId::new();
        let parsed = BillingEvent::parse(&event(
            CHECKOUT_SESSION_COMPLETED,
            json!({
                "id": "cs_1",
                "customer": "cus_1",
                "subscription": "sub_1",
                "metadata": { "user_id": user.to_string() }
            }),
        ))
        .unwrap();

        assert!(matches!(parsed, BillingEvent::CheckoutCompleted(c) if c.user_id == user));
    }

    #[test]
    fn checkout_without_user_metadata_is_rejected() {
        let result = BillingEvent::parse(&event(
            CHECKOUT_SESSION_COMPLETED,
            json!({ "id": "cs_1", "customer": "cus_1", "subscription": "sub_1" }),
        ));
        assert!(matches!(result, Err(WebhookError::MissingMetadata("userId"))));
    }

    #[test]
    fn checkout_without_subscription_is_rejected() {
        let result = BillingEvent::parse(&event(
            CHECKOUT_SESSION_COMPLETED,
            json!({
                "id": "cs_1",
                "customer": "cus_1",
                "metadata": { "userId": UserId::new().to_string() }
            }),
        ));
        assert!(matches!(result, Err(WebhookError::MissingField("subscription"))));
    }

    // ══════════════════════════════════════════════════════════════
    // Subscription lifecycle
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn subscription_updated_carries_snapshot() {
        let parsed = BillingEvent::parse(&event(
            SUBSCRIPTION_UPDATED,
            json!({ "id": "sub_9", "status": "past_due", "ended_at": 1700000000 }),
        ))
        .unwrap();

        match parsed {
            BillingEvent::SubscriptionUpdated(s) => {
                assert_eq!(s.status, SubscriptionStatus::PastDue);
                assert!(s.ended_at.is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn subscription_deleted_keeps_ended_at() {
        let parsed = BillingEvent::parse(&event(
            SUBSCRIPTION_DELETED,
            json!({ "id": "sub_9", "status": "canceled", "ended_at": 1700000000 }),
        ))
        .unwrap();

        assert_eq!(parsed.stripe_subscription_id(), Some("sub_9"));
        assert!(matches!(parsed, BillingEvent::SubscriptionDeleted(d) if d.ended_at.is_some()));
    }

    // ══════════════════════════════════════════════════════════════
    // Invoices
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn failed_invoice_without_next_attempt_has_no_retry() {
        let parsed = BillingEvent::parse(&event(
            INVOICE_PAYMENT_FAILED,
            json!({ "id": "in_1", "subscription": "sub_1", "next_payment_attempt": null }),
        ))
        .unwrap();

        assert!(matches!(
            parsed,
            BillingEvent::InvoicePaymentFailed(InvoiceFailed { retry_scheduled: false, .. })
        ));
    }

    #[test]
    fn one_off_invoice_is_unhandled() {
        let parsed = BillingEvent::parse(&event(
            INVOICE_PAYMENT_SUCCEEDED,
            json!({ "id": "in_1", "subscription": null }),
        ))
        .unwrap();

        assert!(matches!(parsed, BillingEvent::Unhandled { .. }));
        assert!(parsed.stripe_subscription_id().is_none());
    }

    #[test]
    fn unknown_type_is_unhandled() {
        let parsed = BillingEvent::parse(&event("customer.created", json!({}))).unwrap();
        assert!(matches!(
            parsed,
            BillingEvent::Unhandled { ref event_type, .. } if event_type == "customer.created"
        ));
    }
}
