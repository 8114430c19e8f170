//! Stripe payment provider adapter.
//!
//! - `StripePaymentAdapter` - customers, checkout and portal sessions,
//!   subscription lookups over the REST API
//! - `MockPaymentProvider` - in-process stand-in for tests and local runs
//!
//! Secrets are held in `secrecy::SecretString` and never logged.

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
