use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ReferralId, UserId};
use crate::domain::referral::{Referral, ReferralStatus};
use crate::ports::ReferralRepository;

/// Referral store, unique per referred user.
#[derive(Debug, Default)]
pub struct InMemoryReferralRepository {
    referrals: RwLock<HashMap<ReferralId, Referral>>,
}

impl InMemoryReferralRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn all(&self) -> Vec<Referral> {
        self.referrals.read().await.values().cloned().collect()
    }
}

#[async_trait]
impl ReferralRepository for InMemoryReferralRepository {
    async fn insert(&self, referral: &Referral) -> Result<(), DomainError> {
        let mut referrals = self.referrals.write().await;
        if referrals
            .values()
            .any(|r| r.referred_id() == referral.referred_id())
        {
            return Err(DomainError::duplicate("referred user"));
        }
        referrals.insert(*referral.id(), referral.clone());
        Ok(())
    }

    async fn update(&self, referral: &Referral) -> Result<(), DomainError> {
        self.referrals
            .write()
            .await
            .insert(*referral.id(), referral.clone());
        Ok(())
    }

    async fn find_pending_for_referred(&self, referred: &UserId) -> Result<Option<Referral>, DomainError> {
        Ok(self
            .referrals
            .read()
            .await
            .values()
            .find(|r| r.referred_id() == referred && r.status() == ReferralStatus::Pending)
            .cloned())
    }

    async fn count_completed_by_referrer(&self, referrer: &UserId) -> Result<u64, DomainError> {
        Ok(self
            .referrals
            .read()
            .await
            .values()
            .filter(|r| r.referrer_id() == referrer && r.status() == ReferralStatus::Completed)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn one_referral_per_referred_user() {
        let repo = InMemoryReferralRepository::new();
        let referred = UserId::new();
        repo.insert(&Referral::pending(UserId::new(), referred)).await.unwrap();
        assert!(repo.insert(&Referral::pending(UserId::new(), referred)).await.is_err());
    }

    #[tokio::test]
    async fn completed_referrals_are_counted_per_referrer() {
        let repo = InMemoryReferralRepository::new();
        let referrer = UserId::new();
        let referred = UserId::new();
        repo.insert(&Referral::pending(referrer, referred)).await.unwrap();
        repo.insert(&Referral::pending(referrer, UserId::new())).await.unwrap();
        assert_eq!(repo.count_completed_by_referrer(&referrer).await.unwrap(), 0);

        let mut pending = repo.find_pending_for_referred(&referred).await.unwrap().unwrap();
        assert!(pending.complete());
        repo.update(&pending).await.unwrap();

        assert_eq!(repo.count_completed_by_referrer(&referrer).await.unwrap(), 1);
        assert!(repo.find_pending_for_referred(&referred).await.unwrap().is_none());
    }
}
