//! Request and response bodies for billing endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::billing::{Subscription, SubscriptionStatus};
use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};
use crate::domain::user::Tier;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Field names follow the public checkout contract, which mixes cases.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutRequest {
    #[serde(rename = "priceId")]
    pub price_id: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PortalRequest {
    pub return_url: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortalResponse {
    pub url: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: SubscriptionId,
    pub user: UserId,
    pub stripe_subscription_id: String,
    pub stripe_price_id: Option<String>,
    pub status: SubscriptionStatus,
    pub current_period_start: Option<Timestamp>,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: bool,
    pub trial_start: Option<Timestamp>,
    pub trial_end: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<&Subscription> for SubscriptionResponse {
    fn from(sub: &Subscription) -> Self {
        Self {
            id: *sub.id(),
            user: *sub.user_id(),
            stripe_subscription_id: sub.stripe_subscription_id().to_string(),
            stripe_price_id: sub.stripe_price_id().map(str::to_string),
            status: sub.status(),
            current_period_start: sub.current_period_start().copied(),
            current_period_end: sub.current_period_end().copied(),
            cancel_at_period_end: sub.cancel_at_period_end(),
            trial_start: sub.trial_start().copied(),
            trial_end: sub.trial_end().copied(),
            ended_at: sub.ended_at().copied(),
            created_at: *sub.created_at(),
            updated_at: *sub.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MySubscriptionResponse {
    pub user_tier: Tier,
    pub subscription: Option<SubscriptionResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PremiumFeatureResponse {
    pub msg: &'static str,
    pub user: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}
