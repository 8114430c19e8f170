//! HandleStripeWebhookHandler - reconciles local state with processor events.
//!
//! Each verified event is applied at most once: the webhook event log is
//! consulted before dispatch and written after a successful or deliberately
//! ignored outcome. Errors are not logged there, so the processor's
//! redelivery re-runs them.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::billing::{
    BillingEvent, CheckoutCompleted, InvoiceFailed, InvoicePaid, StripeEvent, StripeWebhookVerifier,
    Subscription, SubscriptionDeleted, SubscriptionSnapshot, WebhookError,
};
use crate::domain::foundation::{ErrorCode, SubscriptionId, UserId};
use crate::domain::user::{ReferralCode, User};
use crate::ports::{
    PaymentProvider, ReferralRepository, SaveResult, SubscriptionRepository, UserRepository,
    WebhookEventRecord, WebhookEventRepository, WebhookResult,
};

/// Attempts at a user write before the event is failed back for redelivery.
const USER_UPDATE_ATTEMPTS: u32 = 3;

/// Random draws before giving up on finding an unclaimed referral code.
const REFERRAL_CODE_DRAWS: u32 = 10;

#[derive(Debug, Clone)]
pub struct HandleStripeWebhookCommand {
    /// Raw request body, exactly as signed.
    pub payload: Vec<u8>,
    /// `Stripe-Signature` header.
    pub signature: Option<String>,
}

/// What dispatch did with an event.
#[derive(Debug)]
enum Applied {
    Done,
    Skipped(String),
}

/// Result of a read-modify-write on a user.
#[derive(Debug, PartialEq, Eq)]
enum UserWrite {
    Missing,
    Unchanged,
    Saved,
}

pub struct HandleStripeWebhookHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    users: Arc<dyn UserRepository>,
    referrals: Arc<dyn ReferralRepository>,
    webhook_events: Arc<dyn WebhookEventRepository>,
    payment_provider: Arc<dyn PaymentProvider>,
    verifier: StripeWebhookVerifier,
    require_livemode: bool,
}

impl HandleStripeWebhookHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        users: Arc<dyn UserRepository>,
        referrals: Arc<dyn ReferralRepository>,
        webhook_events: Arc<dyn WebhookEventRepository>,
        payment_provider: Arc<dyn PaymentProvider>,
        verifier: StripeWebhookVerifier,
        require_livemode: bool,
    ) -> Self {
        Self {
            subscriptions,
            users,
            referrals,
            webhook_events,
            payment_provider,
            verifier,
            require_livemode,
        }
    }

    pub async fn handle(&self, cmd: HandleStripeWebhookCommand) -> Result<WebhookResult, WebhookError> {
        // 1. Signature over the raw body, then parse
        let signature = cmd.signature.as_deref().ok_or(WebhookError::InvalidSignature)?;
        let event = self.verifier.verify_and_parse(&cmd.payload, signature)?;

        // 2. Redelivery of something already applied or ignored
        if let Some(previous) = self.webhook_events.find_by_event_id(&event.id).await? {
            info!(
                event_id = %event.id,
                event_type = %event.event_type,
                outcome = %previous.outcome,
                "Webhook event already processed"
            );
            return Ok(WebhookResult::AlreadyProcessed);
        }

        // 3. Apply
        let applied = if self.require_livemode && !event.is_live() {
            Applied::Skipped("test-mode event received in live environment".to_string())
        } else {
            let billing_event = BillingEvent::parse(&event)?;
            self.dispatch(&event, billing_event).await?
        };

        // 4. Record
        let payload = serde_json::to_value(&event).unwrap_or_default();
        let (record, result) = match applied {
            Applied::Done => (
                WebhookEventRecord::success(&event.id, &event.event_type, payload),
                WebhookResult::Processed,
            ),
            Applied::Skipped(reason) => (
                WebhookEventRecord::ignored(&event.id, &event.event_type, reason, payload),
                WebhookResult::Ignored,
            ),
        };
        if self.webhook_events.save(record).await? == SaveResult::AlreadyExists {
            debug!(event_id = %event.id, "Concurrent delivery recorded the event first");
        }

        Ok(result)
    }

    async fn dispatch(&self, event: &StripeEvent, billing_event: BillingEvent) -> Result<Applied, WebhookError> {
        match billing_event {
            BillingEvent::CheckoutCompleted(checkout) => self.checkout_completed(event, checkout).await,
            BillingEvent::SubscriptionUpdated(snapshot) => self.subscription_updated(event, snapshot).await,
            BillingEvent::SubscriptionDeleted(deleted) => self.subscription_deleted(event, deleted).await,
            BillingEvent::InvoicePaymentSucceeded(paid) => self.invoice_paid(event, paid).await,
            BillingEvent::InvoicePaymentFailed(failed) => self.invoice_failed(event, failed).await,
            BillingEvent::Unhandled { event_type, reason } => {
                info!(event_id = %event.id, event_type = %event_type, reason = %reason, "Webhook event not handled");
                Ok(Applied::Skipped(reason))
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Event handlers
    // ═══════════════════════════════════════════════════════════════════════

    async fn checkout_completed(
        &self,
        event: &StripeEvent,
        checkout: CheckoutCompleted,
    ) -> Result<Applied, WebhookError> {
        let sub_id = checkout.stripe_subscription_id.as_str();
        let snapshot = self
            .payment_provider
            .retrieve_subscription(sub_id)
            .await
            .map_err(|e| WebhookError::Provider(e.to_string()))?;

        if self.users.find_by_id(&checkout.user_id).await?.is_none() {
            return Ok(skipped(event, sub_id, Some(&checkout.user_id), "user not found"));
        }

        let subscription = match self.subscriptions.find_by_stripe_id(sub_id).await? {
            Some(mut existing) => {
                existing.apply_snapshot(snapshot);
                existing
            }
            None => Subscription::from_snapshot(SubscriptionId::new(), checkout.user_id, snapshot),
        };
        let subscription = self.subscriptions.upsert(&subscription).await?;

        let code = self.referral_code_for(&checkout.user_id).await?;
        let write = self
            .update_user(&checkout.user_id, |user| {
                let attached = user.stripe_customer_id() != Some(checkout.customer_id.as_str());
                if attached {
                    user.attach_customer(checkout.customer_id.clone());
                }
                let promoted = user.promote(sub_id);
                let coded = assign_code(user, code.as_ref());
                attached || promoted || coded
            })
            .await?;
        if write == UserWrite::Missing {
            return Ok(skipped(event, sub_id, Some(&checkout.user_id), "user not found"));
        }

        self.complete_referral(&checkout.user_id).await?;
        info!(
            event_id = %event.id,
            user_id = %checkout.user_id,
            stripe_subscription_id = %sub_id,
            status = %subscription.status(),
            "Checkout completed, user promoted"
        );
        Ok(Applied::Done)
    }

    async fn subscription_updated(
        &self,
        event: &StripeEvent,
        snapshot: SubscriptionSnapshot,
    ) -> Result<Applied, WebhookError> {
        let sub_id = snapshot.stripe_subscription_id.clone();
        let Some(mut subscription) = self.subscriptions.find_by_stripe_id(&sub_id).await? else {
            return Ok(skipped(event, &sub_id, None, "subscription not found"));
        };
        let ended = snapshot.ended_at.is_some();
        subscription.apply_snapshot(snapshot);
        let subscription = self.subscriptions.upsert(&subscription).await?;

        let user_id = *subscription.user_id();
        let status = subscription.status();
        if status.is_entitling() {
            let code = self.referral_code_for(&user_id).await?;
            let write = self
                .update_user(&user_id, |user| {
                    let promoted = user.promote(&sub_id);
                    let coded = assign_code(user, code.as_ref());
                    promoted || coded
                })
                .await?;
            if write == UserWrite::Missing {
                return Ok(skipped(event, &sub_id, Some(&user_id), "user not found"));
            }
            self.complete_referral(&user_id).await?;
        } else if status.is_lapsed() && ended {
            let write = self
                .update_user(&user_id, |user| user.demote_if_current(&sub_id))
                .await?;
            if write == UserWrite::Missing {
                return Ok(skipped(event, &sub_id, Some(&user_id), "user not found"));
            }
            if write == UserWrite::Saved {
                info!(user_id = %user_id, stripe_subscription_id = %sub_id, "User demoted after lapse");
            }
        }

        info!(event_id = %event.id, stripe_subscription_id = %sub_id, status = %status, "Subscription updated");
        Ok(Applied::Done)
    }

    async fn subscription_deleted(
        &self,
        event: &StripeEvent,
        deleted: SubscriptionDeleted,
    ) -> Result<Applied, WebhookError> {
        let sub_id = deleted.stripe_subscription_id.as_str();
        let Some(mut subscription) = self.subscriptions.find_by_stripe_id(sub_id).await? else {
            return Ok(skipped(event, sub_id, None, "subscription not found"));
        };
        subscription.mark_deleted(deleted.ended_at);
        let subscription = self.subscriptions.upsert(&subscription).await?;

        let user_id = *subscription.user_id();
        let write = self
            .update_user(&user_id, |user| user.demote_if_current(sub_id))
            .await?;
        if write == UserWrite::Missing {
            return Ok(skipped(event, sub_id, Some(&user_id), "user not found"));
        }

        info!(
            event_id = %event.id,
            user_id = %user_id,
            stripe_subscription_id = %sub_id,
            demoted = write == UserWrite::Saved,
            "Subscription ended"
        );
        Ok(Applied::Done)
    }

    async fn invoice_paid(&self, event: &StripeEvent, paid: InvoicePaid) -> Result<Applied, WebhookError> {
        let sub_id = paid.stripe_subscription_id.as_str();
        let Some(mut subscription) = self.subscriptions.find_by_stripe_id(sub_id).await? else {
            return Ok(skipped(event, sub_id, None, "subscription not found"));
        };
        subscription.mark_invoice_paid(paid.period_start, paid.period_end);
        if !subscription.status().is_entitling() {
            info!(
                event_id = %event.id,
                invoice_id = %paid.invoice_id,
                stripe_subscription_id = %sub_id,
                status = %subscription.status(),
                "Invoice paid for a subscription that no longer grants premium"
            );
            return Ok(Applied::Skipped(format!("subscription is {}", subscription.status())));
        }
        let subscription = self.subscriptions.upsert(&subscription).await?;

        let user_id = *subscription.user_id();
        let code = self.referral_code_for(&user_id).await?;
        let write = self
            .update_user(&user_id, |user| {
                if user.is_premium() {
                    return false;
                }
                user.promote(sub_id);
                assign_code(user, code.as_ref());
                true
            })
            .await?;
        if write == UserWrite::Missing {
            return Ok(skipped(event, sub_id, Some(&user_id), "user not found"));
        }
        self.complete_referral(&user_id).await?;

        info!(event_id = %event.id, invoice_id = %paid.invoice_id, stripe_subscription_id = %sub_id, "Invoice paid");
        Ok(Applied::Done)
    }

    async fn invoice_failed(&self, event: &StripeEvent, failed: InvoiceFailed) -> Result<Applied, WebhookError> {
        let sub_id = failed.stripe_subscription_id.as_str();
        let Some(mut subscription) = self.subscriptions.find_by_stripe_id(sub_id).await? else {
            return Ok(skipped(event, sub_id, None, "subscription not found"));
        };
        subscription.mark_payment_failed(failed.retry_scheduled);
        let subscription = self.subscriptions.upsert(&subscription).await?;

        if !failed.retry_scheduled {
            let user_id = *subscription.user_id();
            let write = self
                .update_user(&user_id, |user| user.demote_if_current(sub_id))
                .await?;
            if write == UserWrite::Missing {
                return Ok(skipped(event, sub_id, Some(&user_id), "user not found"));
            }
        }

        warn!(
            event_id = %event.id,
            invoice_id = %failed.invoice_id,
            stripe_subscription_id = %sub_id,
            retry_scheduled = failed.retry_scheduled,
            "Invoice payment failed"
        );
        Ok(Applied::Done)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Helpers
    // ═══════════════════════════════════════════════════════════════════════

    /// Re-reads and re-applies `mutate` when another writer bumped the
    /// user's version in between. `mutate` returns whether it changed anything.
    async fn update_user<F>(&self, user_id: &UserId, mut mutate: F) -> Result<UserWrite, WebhookError>
    where
        F: FnMut(&mut User) -> bool + Send,
    {
        let mut attempt = 1;
        loop {
            let Some(mut user) = self.users.find_by_id(user_id).await? else {
                return Ok(UserWrite::Missing);
            };
            if !mutate(&mut user) {
                return Ok(UserWrite::Unchanged);
            }
            match self.users.update(&user).await {
                Ok(()) => return Ok(UserWrite::Saved),
                Err(err)
                    if err.code == ErrorCode::ConcurrentModification
                        && attempt < USER_UPDATE_ATTEMPTS =>
                {
                    debug!(user_id = %user_id, attempt, "User changed concurrently, retrying");
                    attempt += 1;
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    /// An unclaimed code for `user_id`, or `None` when it already has one
    /// (or no longer exists).
    async fn referral_code_for(&self, user_id: &UserId) -> Result<Option<ReferralCode>, WebhookError> {
        match self.users.find_by_id(user_id).await? {
            Some(user) if user.referral_code().is_none() => {
                Ok(Some(unique_referral_code(self.users.as_ref(), ReferralCode::generate).await?))
            }
            _ => Ok(None),
        }
    }

    async fn complete_referral(&self, referred: &UserId) -> Result<(), WebhookError> {
        let Some(mut referral) = self.referrals.find_pending_for_referred(referred).await? else {
            return Ok(());
        };
        if referral.complete() {
            self.referrals.update(&referral).await?;
            info!(
                referrer_id = %referral.referrer_id(),
                referred_id = %referred,
                "Referral completed"
            );
        }
        Ok(())
    }
}

/// Draws codes until one is not held by any user.
async fn unique_referral_code<G>(users: &dyn UserRepository, mut draw: G) -> Result<ReferralCode, WebhookError>
where
    G: FnMut() -> ReferralCode + Send,
{
    for _ in 0..REFERRAL_CODE_DRAWS {
        let code = draw();
        if users.find_by_referral_code(code.as_str()).await?.is_none() {
            return Ok(code);
        }
        debug!(referral_code = %code, "Referral code already taken, drawing again");
    }
    Err(WebhookError::Database(format!(
        "no unclaimed referral code after {} draws",
        REFERRAL_CODE_DRAWS
    )))
}

fn assign_code(user: &mut User, code: Option<&ReferralCode>) -> bool {
    code.is_some_and(|code| user.assign_referral_code(code.clone()))
}

fn skipped(event: &StripeEvent, stripe_subscription_id: &str, user_id: Option<&UserId>, reason: &str) -> Applied {
    warn!(
        event_id = %event.id,
        event_type = %event.event_type,
        stripe_subscription_id = %stripe_subscription_id,
        user_id = ?user_id.map(ToString::to_string),
        reason,
        "Webhook references unknown local record"
    );
    Applied::Skipped(reason.to_string())
}
