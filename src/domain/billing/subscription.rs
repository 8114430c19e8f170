//! Local mirror of a processor subscription.

use crate::domain::foundation::{SubscriptionId, Timestamp, UserId};

use super::SubscriptionStatus;

/// The processor's view of a subscription at the moment an event fired.
#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptionSnapshot {
    pub stripe_subscription_id: String,
    pub stripe_price_id: Option<String>,
    pub status: SubscriptionStatus,
    pub current_period_start: Option<Timestamp>,
    pub current_period_end: Option<Timestamp>,
    pub cancel_at_period_end: bool,
    pub trial_start: Option<Timestamp>,
    pub trial_end: Option<Timestamp>,
    pub ended_at: Option<Timestamp>,
}

/// A user's paid subscription.
///
/// Records are created on the first completed checkout and are never
/// deleted; a subscription deleted upstream becomes `Ended`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    id: SubscriptionId,
    user_id: UserId,
    stripe_subscription_id: String,
    stripe_price_id: Option<String>,
    status: SubscriptionStatus,
    current_period_start: Option<Timestamp>,
    current_period_end: Option<Timestamp>,
    cancel_at_period_end: bool,
    trial_start: Option<Timestamp>,
    trial_end: Option<Timestamp>,
    ended_at: Option<Timestamp>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Subscription {
    pub fn from_snapshot(id: SubscriptionId, user_id: UserId, snapshot: SubscriptionSnapshot) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            user_id,
            stripe_subscription_id: snapshot.stripe_subscription_id,
            stripe_price_id: snapshot.stripe_price_id,
            status: snapshot.status,
            current_period_start: snapshot.current_period_start,
            current_period_end: snapshot.current_period_end,
            cancel_at_period_end: snapshot.cancel_at_period_end,
            trial_start: snapshot.trial_start,
            trial_end: snapshot.trial_end,
            ended_at: snapshot.ended_at,
            created_at: now,
            updated_at: now,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SubscriptionId,
        user_id: UserId,
        stripe_subscription_id: String,
        stripe_price_id: Option<String>,
        status: SubscriptionStatus,
        current_period_start: Option<Timestamp>,
        current_period_end: Option<Timestamp>,
        cancel_at_period_end: bool,
        trial_start: Option<Timestamp>,
        trial_end: Option<Timestamp>,
        ended_at: Option<Timestamp>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            user_id,
            stripe_subscription_id,
            stripe_price_id,
            status,
            current_period_start,
            current_period_end,
            cancel_at_period_end,
            trial_start,
            trial_end,
            ended_at,
            created_at,
            updated_at,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SubscriptionId {
        &self.id
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn stripe_subscription_id(&self) -> &str {
        &self.stripe_subscription_id
    }

    pub fn stripe_price_id(&self) -> Option<&str> {
        self.stripe_price_id.as_deref()
    }

    pub fn status(&self) -> SubscriptionStatus {
        self.status
    }

    pub fn current_period_start(&self) -> Option<&Timestamp> {
        self.current_period_start.as_ref()
    }

    pub fn current_period_end(&self) -> Option<&Timestamp> {
        self.current_period_end.as_ref()
    }

    pub fn cancel_at_period_end(&self) -> bool {
        self.cancel_at_period_end
    }

    pub fn trial_start(&self) -> Option<&Timestamp> {
        self.trial_start.as_ref()
    }

    pub fn trial_end(&self) -> Option<&Timestamp> {
        self.trial_end.as_ref()
    }

    pub fn ended_at(&self) -> Option<&Timestamp> {
        self.ended_at.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    // ───────────────────────────────────────────────────────────────
    // Transitions
    // ───────────────────────────────────────────────────────────────

    /// Overwrites every mirrored field with the processor's view.
    ///
    /// An `Ended` record stays ended; late update events cannot revive it.
    pub fn apply_snapshot(&mut self, snapshot: SubscriptionSnapshot) {
        if self.status.is_terminal() {
            return;
        }
        self.stripe_price_id = snapshot.stripe_price_id.or_else(|| self.stripe_price_id.take());
        self.status = snapshot.status;
        self.current_period_start = snapshot.current_period_start;
        self.current_period_end = snapshot.current_period_end;
        self.cancel_at_period_end = snapshot.cancel_at_period_end;
        self.trial_start = snapshot.trial_start;
        self.trial_end = snapshot.trial_end;
        self.ended_at = snapshot.ended_at;
        self.touch();
    }

    /// The subscription was deleted upstream.
    pub fn mark_deleted(&mut self, ended_at: Option<Timestamp>) {
        self.status = SubscriptionStatus::Ended;
        self.ended_at = Some(ended_at.unwrap_or_else(Timestamp::now));
        self.cancel_at_period_end = true;
        self.touch();
    }

    /// An invoice for this subscription was paid.
    pub fn mark_invoice_paid(&mut self, period_start: Option<Timestamp>, period_end: Option<Timestamp>) {
        if self.status.is_terminal() {
            return;
        }
        self.status = SubscriptionStatus::Active;
        if period_start.is_some() {
            self.current_period_start = period_start;
        }
        if period_end.is_some() {
            self.current_period_end = period_end;
        }
        self.ended_at = None;
        self.touch();
    }

    /// An invoice payment failed. Without a scheduled retry the
    /// subscription is unpaid and ends now.
    pub fn mark_payment_failed(&mut self, retry_scheduled: bool) {
        if self.status.is_terminal() {
            return;
        }
        if retry_scheduled {
            self.status = SubscriptionStatus::PastDue;
        } else {
            self.status = SubscriptionStatus::Unpaid;
            self.ended_at = Some(Timestamp::now());
        }
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

/// Picks the subscription to show on "my subscription": a current status
/// with the latest period end.
pub fn select_current(subscriptions: &[Subscription]) -> Option<&Subscription> {
    subscriptions
        .iter()
        .filter(|s| s.status().is_current())
        .max_by_key(|s| s.current_period_end().map(Timestamp::as_unix_secs).unwrap_or(i64::MIN))
}
