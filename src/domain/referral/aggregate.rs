//! Referral aggregate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ReferralId, Timestamp, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralStatus {
    Pending,
    Completed,
}

impl ReferralStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralStatus::Pending => "pending",
            ReferralStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for ReferralStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReferralStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ReferralStatus::Pending),
            "completed" => Ok(ReferralStatus::Completed),
            other => Err(format!("unknown referral status: {}", other)),
        }
    }
}

/// A (referrer, referred) pair recorded at registration.
///
/// # Invariants
///
/// - at most one referral per referred user (store-level unique index)
/// - status only moves `Pending -> Completed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Referral {
    id: ReferralId,
    referrer_id: UserId,
    referred_id: UserId,
    status: ReferralStatus,
    created_at: Timestamp,
    completed_at: Option<Timestamp>,
}

impl Referral {
    pub fn pending(referrer_id: UserId, referred_id: UserId) -> Self {
        Self {
            id: ReferralId::new(),
            referrer_id,
            referred_id,
            status: ReferralStatus::Pending,
            created_at: Timestamp::now(),
            completed_at: None,
        }
    }

    pub fn reconstitute(
        id: ReferralId,
        referrer_id: UserId,
        referred_id: UserId,
        status: ReferralStatus,
        created_at: Timestamp,
        completed_at: Option<Timestamp>,
    ) -> Self {
        Self {
            id,
            referrer_id,
            referred_id,
            status,
            created_at,
            completed_at,
        }
    }

    pub fn id(&self) -> &ReferralId {
        &self.id
    }

    pub fn referrer_id(&self) -> &UserId {
        &self.referrer_id
    }

    pub fn referred_id(&self) -> &UserId {
        &self.referred_id
    }

    pub fn status(&self) -> ReferralStatus {
        self.status
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    /// Marks the referral as successful. Returns false if it already was.
    pub fn complete(&mut self) -> bool {
        if self.status == ReferralStatus::Completed {
            return false;
        }
        self.status = ReferralStatus::Completed;
        self.completed_at = Some(Timestamp::now());
        true
    }
}
