//! Billing: subscriptions mirrored from the payment processor and the
//! webhook events that drive them.

mod billing_event;
mod status;
mod stripe_event;
mod subscription;
mod webhook_errors;
mod webhook_verifier;

pub use billing_event::{
    BillingEvent, CheckoutCompleted, InvoiceFailed, InvoicePaid, SubscriptionDeleted,
    CHECKOUT_SESSION_COMPLETED, INVOICE_PAYMENT_FAILED, INVOICE_PAYMENT_SUCCEEDED,
    SUBSCRIPTION_DELETED, SUBSCRIPTION_UPDATED,
};
pub use status::{SubscriptionStatus, UnknownStatus};
pub use stripe_event::{
    StripeCheckoutSession, StripeEvent, StripeEventData, StripeInvoice, StripeList,
    StripeSubscription,
};
pub use subscription::{select_current, Subscription, SubscriptionSnapshot};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub(crate) use stripe_event::StripeEventBuilder;
