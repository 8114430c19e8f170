//! GetMySubscriptionHandler - the caller's tier and current subscription.

use std::sync::Arc;

use crate::application::AppError;
use crate::domain::billing::{select_current, Subscription};
use crate::domain::foundation::UserId;
use crate::domain::user::Tier;
use crate::ports::{SubscriptionRepository, UserRepository};

use super::USER_NOT_FOUND;

const NO_RECORD: &str =
    "No active or recent Stripe subscription record found. User tier is based on User record.";

#[derive(Debug, Clone)]
pub struct MySubscription {
    pub tier: Tier,
    pub subscription: Option<Subscription>,
    pub message: Option<String>,
}

pub struct GetMySubscriptionHandler {
    users: Arc<dyn UserRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
}

impl GetMySubscriptionHandler {
    pub fn new(users: Arc<dyn UserRepository>, subscriptions: Arc<dyn SubscriptionRepository>) -> Self {
        Self {
            users,
            subscriptions,
        }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<MySubscription, AppError> {
        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;
        let all = self.subscriptions.list_by_user(&user_id).await?;

        let subscription = select_current(&all).cloned();
        let message = subscription.is_none().then(|| NO_RECORD.to_string());
        Ok(MySubscription {
            tier: user.tier(),
            subscription,
            message,
        })
    }
}
