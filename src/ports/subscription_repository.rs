//! Subscription repository port.
//!
//! Subscriptions are keyed by the processor's subscription id, which is
//! unique. Records are never deleted.

use async_trait::async_trait;

use crate::domain::billing::Subscription;
use crate::domain::foundation::{DomainError, UserId};

#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Insert or overwrite the record with the same processor id.
    ///
    /// Returns the stored record; on conflict the existing local id and
    /// creation time are kept.
    async fn upsert(&self, subscription: &Subscription) -> Result<Subscription, DomainError>;

    async fn find_by_stripe_id(&self, stripe_subscription_id: &str) -> Result<Option<Subscription>, DomainError>;

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError>;
}
