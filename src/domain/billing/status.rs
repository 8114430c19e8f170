//! Subscription status as reported by the payment processor.
//!
//! The processor owns the lifecycle; locally we only mirror what webhooks
//! tell us. `Ended` is the one status we assign ourselves, when a
//! subscription is deleted upstream.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// Checkout finished but the first payment has not cleared.
    Incomplete,
    Trialing,
    Active,
    /// Latest invoice failed; the processor is still retrying.
    PastDue,
    /// Retries exhausted.
    Unpaid,
    Canceled,
    /// Deleted upstream. Terminal.
    Ended,
}

impl SubscriptionStatus {
    /// Returns true if this status grants the premium tier.
    pub fn is_entitling(&self) -> bool {
        matches!(self, SubscriptionStatus::Active | SubscriptionStatus::Trialing)
    }

    /// Returns true if the subscription is still a candidate for
    /// "my subscription" views.
    pub fn is_current(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::Active
                | SubscriptionStatus::Trialing
                | SubscriptionStatus::PastDue
                | SubscriptionStatus::Incomplete
        )
    }

    /// Returns true if the user should lose premium when this status is
    /// observed together with an end timestamp.
    pub fn is_lapsed(&self) -> bool {
        matches!(
            self,
            SubscriptionStatus::PastDue | SubscriptionStatus::Unpaid | SubscriptionStatus::Canceled
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubscriptionStatus::Ended)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Ended => "ended",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subscription status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for SubscriptionStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incomplete" | "incomplete_expired" => Ok(SubscriptionStatus::Incomplete),
            "trialing" => Ok(SubscriptionStatus::Trialing),
            "active" => Ok(SubscriptionStatus::Active),
            "past_due" => Ok(SubscriptionStatus::PastDue),
            "unpaid" => Ok(SubscriptionStatus::Unpaid),
            "canceled" | "cancelled" => Ok(SubscriptionStatus::Canceled),
            "ended" => Ok(SubscriptionStatus::Ended),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_and_trialing_entitle() {
        assert!(SubscriptionStatus::Active.is_entitling());
        assert!(SubscriptionStatus::Trialing.is_entitling());
        assert!(!SubscriptionStatus::PastDue.is_entitling());
        assert!(!SubscriptionStatus::Incomplete.is_entitling());
        assert!(!SubscriptionStatus::Ended.is_entitling());
    }

    #[test]
    fn past_due_is_still_current() {
        assert!(SubscriptionStatus::PastDue.is_current());
        assert!(!SubscriptionStatus::Canceled.is_current());
        assert!(!SubscriptionStatus::Unpaid.is_current());
    }

    #[test]
    fn ended_is_terminal() {
        assert!(SubscriptionStatus::Ended.is_terminal());
        assert!(!SubscriptionStatus::Canceled.is_terminal());
    }

    #[test]
    fn parses_processor_strings() {
        assert_eq!("past_due".parse(), Ok(SubscriptionStatus::PastDue));
        assert_eq!("incomplete_expired".parse(), Ok(SubscriptionStatus::Incomplete));
        assert!("paused".parse::<SubscriptionStatus>().is_err());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&SubscriptionStatus::PastDue).unwrap();
        assert_eq!(json, "\"past_due\"");
        assert_eq!(SubscriptionStatus::PastDue.to_string(), "past_due");
    }
}
