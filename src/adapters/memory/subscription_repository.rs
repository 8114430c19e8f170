use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::billing::Subscription;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::SubscriptionRepository;

/// Subscriptions keyed by processor subscription id.
#[derive(Debug, Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<HashMap<String, Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn upsert(&self, subscription: &Subscription) -> Result<Subscription, DomainError> {
        let mut subscriptions = self.subscriptions.write().await;
        let key = subscription.stripe_subscription_id().to_string();
        let stored = match subscriptions.get(&key) {
            // The first insert owns the row identity.
            Some(existing) => Subscription::reconstitute(
                *existing.id(),
                *subscription.user_id(),
                key.clone(),
                subscription.stripe_price_id().map(str::to_string),
                subscription.status(),
                subscription.current_period_start().copied(),
                subscription.current_period_end().copied(),
                subscription.cancel_at_period_end(),
                subscription.trial_start().copied(),
                subscription.trial_end().copied(),
                subscription.ended_at().copied(),
                *existing.created_at(),
                *subscription.updated_at(),
            ),
            None => subscription.clone(),
        };
        subscriptions.insert(key, stored.clone());
        Ok(stored)
    }

    async fn find_by_stripe_id(&self, stripe_subscription_id: &str) -> Result<Option<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .get(stripe_subscription_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, DomainError> {
        Ok(self
            .subscriptions
            .read()
            .await
            .values()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect())
    }
}
