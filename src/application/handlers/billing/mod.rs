//! Billing handlers: checkout and portal sessions, the caller's
//! subscription, and webhook reconciliation.

mod create_checkout_session;
mod create_portal_session;
mod get_my_subscription;
mod handle_stripe_webhook;

pub use create_checkout_session::{CreateCheckoutSessionCommand, CreateCheckoutSessionHandler};
pub use create_portal_session::{CreatePortalSessionCommand, CreatePortalSessionHandler};
pub use get_my_subscription::{GetMySubscriptionHandler, MySubscription};
pub use handle_stripe_webhook::{HandleStripeWebhookCommand, HandleStripeWebhookHandler};

const USER_NOT_FOUND: &str = "User not found.";

/// `Some` only when the value is present and not blank.
fn provided(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
