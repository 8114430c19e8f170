//! Referral repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::referral::Referral;

#[async_trait]
pub trait ReferralRepository: Send + Sync {
    /// Insert a referral. A user can be referred only once.
    ///
    /// # Errors
    ///
    /// - `Duplicate` when the referred user already has a referral
    async fn insert(&self, referral: &Referral) -> Result<(), DomainError>;

    async fn update(&self, referral: &Referral) -> Result<(), DomainError>;

    /// The pending referral in which `referred` is the referred party.
    async fn find_pending_for_referred(&self, referred: &UserId) -> Result<Option<Referral>, DomainError>;

    /// Completed referrals credited to `referrer`.
    async fn count_completed_by_referrer(&self, referrer: &UserId) -> Result<u64, DomainError>;
}
