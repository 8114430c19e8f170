//! GetReferralStatsHandler - the caller's code and completed referrals.

use std::sync::Arc;

use crate::application::AppError;
use crate::domain::foundation::UserId;
use crate::ports::{ReferralRepository, UserRepository};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferralStats {
    pub referral_code: Option<String>,
    pub successful_referrals: u64,
}

/// Users receive a code when they first subscribe; without one nothing
/// they could have referred is counted.
pub struct GetReferralStatsHandler {
    users: Arc<dyn UserRepository>,
    referrals: Arc<dyn ReferralRepository>,
}

impl GetReferralStatsHandler {
    pub fn new(users: Arc<dyn UserRepository>, referrals: Arc<dyn ReferralRepository>) -> Self {
        Self { users, referrals }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<ReferralStats, AppError> {
        let user = self
            .users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found."))?;

        let Some(code) = user.referral_code() else {
            return Ok(ReferralStats {
                referral_code: None,
                successful_referrals: 0,
            });
        };

        let successful_referrals = self.referrals.count_completed_by_referrer(&user_id).await?;
        Ok(ReferralStats {
            referral_code: Some(code.as_str().to_string()),
            successful_referrals,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryReferralRepository, InMemoryUserRepository};
    use crate::application::handlers::test_support::seed_user;
    use crate::domain::referral::Referral;
    use crate::domain::user::ReferralCode;

    #[tokio::test]
    async fn user_without_code_has_no_stats() {
        let users = Arc::new(InMemoryUserRepository::new());
        let alice = seed_user(&users, "alice").await;
        let handler = GetReferralStatsHandler::new(users, Arc::new(InMemoryReferralRepository::new()));

        let stats = handler.handle(*alice.id()).await.unwrap();

        assert_eq!(
            stats,
            ReferralStats {
                referral_code: None,
                successful_referrals: 0
            }
        );
    }

    #[tokio::test]
    async fn counts_only_completed_referrals() {
        let users = Arc::new(InMemoryUserRepository::new());
        let referrals = Arc::new(InMemoryReferralRepository::new());
        let mut alice = seed_user(&users, "alice").await;
        alice.assign_referral_code(ReferralCode::parse("A1B2C3").unwrap());
        users.update(&alice).await.unwrap();

        let mut done = Referral::pending(*alice.id(), UserId::new());
        done.complete();
        referrals.insert(&done).await.unwrap();
        referrals
            .insert(&Referral::pending(*alice.id(), UserId::new()))
            .await
            .unwrap();

        let stats = GetReferralStatsHandler::new(users, referrals)
            .handle(*alice.id())
            .await
            .unwrap();

        assert_eq!(stats.referral_code.as_deref(), Some("A1B2C3"));
        assert_eq!(stats.successful_referrals, 1);
    }
}
