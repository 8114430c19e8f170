//! HTTP handlers for billing endpoints.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::extract::JsonBody;
use crate::adapters::http::middleware::{RequireAuth, RequirePremium};
use crate::adapters::http::state::AppState;
use crate::application::handlers::{
    CreateCheckoutSessionCommand, CreatePortalSessionCommand, HandleStripeWebhookCommand,
};
use crate::application::AppError;
use crate::ports::WebhookResult;

use super::dto::{
    CheckoutRequest, CheckoutResponse, MySubscriptionResponse, PortalRequest, PortalResponse,
    PremiumFeatureResponse, SubscriptionResponse, WebhookAck,
};

const STRIPE_SIGNATURE: &str = "Stripe-Signature";

/// POST /api/subscriptions/create-checkout-session
pub async fn create_checkout_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(req): JsonBody<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let session = state
        .checkout_handler()
        .handle(CreateCheckoutSessionCommand {
            user_id: user.id,
            price_id: req.price_id,
            success_url: req.success_url,
            cancel_url: req.cancel_url,
        })
        .await?;

    Ok(Json(CheckoutResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// POST /api/subscriptions/create-customer-portal-session
pub async fn create_portal_session(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(req): JsonBody<PortalRequest>,
) -> Result<Json<PortalResponse>, AppError> {
    let session = state
        .portal_handler()
        .handle(CreatePortalSessionCommand {
            user_id: user.id,
            return_url: req.return_url,
        })
        .await?;

    Ok(Json(PortalResponse { url: session.url }))
}

/// GET /api/subscriptions/my-subscription
pub async fn my_subscription(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<MySubscriptionResponse>, AppError> {
    let mine = state.my_subscription_handler().handle(user.id).await?;

    Ok(Json(MySubscriptionResponse {
        user_tier: mine.tier,
        subscription: mine.subscription.as_ref().map(SubscriptionResponse::from),
        message: mine.message,
    }))
}

/// GET /api/subscriptions/premium-feature
pub async fn premium_feature(RequirePremium(user): RequirePremium) -> Json<PremiumFeatureResponse> {
    Json(PremiumFeatureResponse {
        msg: "Welcome to the premium feature!",
        user: user.username,
    })
}

/// POST /api/subscriptions/webhook
///
/// Takes the raw body: the signature covers the exact bytes sent.
pub async fn stripe_webhook(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let signature = headers
        .get(STRIPE_SIGNATURE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let command = HandleStripeWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    match state.webhook_handler().handle(command).await {
        Ok(result) => {
            if result == WebhookResult::AlreadyProcessed {
                tracing::debug!("Duplicate webhook delivery acknowledged");
            }
            Json(WebhookAck { received: true }).into_response()
        }
        Err(err) => err.into_response(),
    }
}
