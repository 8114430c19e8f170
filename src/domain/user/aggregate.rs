//! User aggregate.

use crate::domain::foundation::{AuthenticatedUser, Timestamp, UserId, ValidationError};

use super::credentials::{Email, Username};
use super::profile::{Profile, ProfileUpdate};
use super::referral_code::ReferralCode;
use super::tier::Tier;

/// A registered account.
///
/// # Invariants
///
/// - `username` and `email` are unique across users (enforced by the store)
/// - `tier` is `Premium` only after the billing reconciler observed an
///   active or trialing subscription
/// - `referral_code`, once assigned, never changes
/// - `version` increases by one on every persisted update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: String,
    email: String,
    password_hash: String,
    tier: Tier,
    stripe_customer_id: Option<String>,
    subscription_id: Option<String>,
    referral_code: Option<ReferralCode>,
    referred_by: Option<UserId>,
    profile: Profile,
    created_at: Timestamp,
    updated_at: Timestamp,
    version: i64,
}

impl User {
    /// Creates a new free-tier account.
    pub fn register(
        id: UserId,
        username: Username,
        email: Email,
        password_hash: String,
        referred_by: Option<UserId>,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            id,
            username: username.into_inner(),
            email: email.into_inner(),
            password_hash,
            tier: Tier::Free,
            stripe_customer_id: None,
            subscription_id: None,
            referral_code: None,
            referred_by,
            profile: Profile::default(),
            created_at: now,
            updated_at: now,
            version: 1,
        }
    }

    /// Reconstitute a user from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: UserId,
        username: String,
        email: String,
        password_hash: String,
        tier: Tier,
        stripe_customer_id: Option<String>,
        subscription_id: Option<String>,
        referral_code: Option<ReferralCode>,
        referred_by: Option<UserId>,
        profile: Profile,
        created_at: Timestamp,
        updated_at: Timestamp,
        version: i64,
    ) -> Self {
        Self {
            id,
            username,
            email,
            password_hash,
            tier,
            stripe_customer_id,
            subscription_id,
            referral_code,
            referred_by,
            profile,
            created_at,
            updated_at,
            version,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    pub fn is_premium(&self) -> bool {
        self.tier == Tier::Premium
    }

    pub fn stripe_customer_id(&self) -> Option<&str> {
        self.stripe_customer_id.as_deref()
    }

    /// Stripe id of the subscription currently granting premium.
    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription_id.as_deref()
    }

    pub fn referral_code(&self) -> Option<&ReferralCode> {
        self.referral_code.as_ref()
    }

    pub fn referred_by(&self) -> Option<&UserId> {
        self.referred_by.as_ref()
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// Version read from the store; updates are conditional on it.
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Copy carrying the version a store assigned after a conditional write.
    pub fn with_version(mut self, version: i64) -> Self {
        self.version = version;
        self
    }

    pub fn to_authenticated(&self) -> AuthenticatedUser {
        AuthenticatedUser::new(self.id, &self.username, &self.email, self.tier)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Billing mutations
    // ─────────────────────────────────────────────────────────────────────────

    pub fn attach_customer(&mut self, customer_id: impl Into<String>) {
        self.stripe_customer_id = Some(customer_id.into());
        self.touch();
    }

    /// Grants premium through the given subscription.
    ///
    /// Returns false when nothing changed.
    pub fn promote(&mut self, subscription_id: &str) -> bool {
        if self.tier == Tier::Premium && self.subscription_id.as_deref() == Some(subscription_id) {
            return false;
        }
        self.tier = Tier::Premium;
        self.subscription_id = Some(subscription_id.to_string());
        self.touch();
        true
    }

    /// Drops to free, but only when `subscription_id` is the one currently
    /// granting premium. A lapse of some older subscription is ignored.
    pub fn demote_if_current(&mut self, subscription_id: &str) -> bool {
        if self.subscription_id.as_deref() != Some(subscription_id) {
            return false;
        }
        self.tier = Tier::Free;
        self.subscription_id = None;
        self.touch();
        true
    }

    /// Assigns a referral code unless one already exists.
    pub fn assign_referral_code(&mut self, code: ReferralCode) -> bool {
        if self.referral_code.is_some() {
            return false;
        }
        self.referral_code = Some(code);
        self.touch();
        true
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Profile
    // ─────────────────────────────────────────────────────────────────────────

    pub fn update_profile(&mut self, update: ProfileUpdate) -> Result<(), Vec<ValidationError>> {
        self.profile = self.profile.apply(update)?;
        self.touch();
        Ok(())
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User::register(
            UserId::new(),
            Username::parse("alice").unwrap(),
            Email::parse("A@X.com").unwrap(),
            "$2b$04$hash".to_string(),
            None,
        )
    }

    #[test]
    fn registered_user_starts_free() {
        let user = alice();
        assert_eq!(user.tier(), Tier::Free);
        assert_eq!(user.email(), "a@x.com");
        assert_eq!(user.version(), 1);
        assert!(user.referral_code().is_none());
        assert!(user.subscription_id().is_none());
    }

    #[test]
    fn promote_sets_subscription() {
        let mut user = alice();
        assert!(user.promote("sub_1"));
        assert!(user.is_premium());
        assert_eq!(user.subscription_id(), Some("sub_1"));
        assert!(!user.promote("sub_1"), "second promote is a no-op");
    }

    #[test]
    fn demote_ignores_other_subscriptions() {
        let mut user = alice();
        user.promote("sub_new");
        assert!(!user.demote_if_current("sub_old"));
        assert!(user.is_premium());

        assert!(user.demote_if_current("sub_new"));
        assert_eq!(user.tier(), Tier::Free);
        assert!(user.subscription_id().is_none());
    }

    #[test]
    fn referral_code_is_assigned_once() {
        let mut user = alice();
        let first = ReferralCode::parse("ABC123").unwrap();
        assert!(user.assign_referral_code(first.clone()));
        assert!(!user.assign_referral_code(ReferralCode::parse("FFFFFF").unwrap()));
        assert_eq!(user.referral_code(), Some(&first));
    }

    #[test]
    fn attach_customer_records_id() {
        let mut user = alice();
        user.attach_customer("cus_42");
        assert_eq!(user.stripe_customer_id(), Some("cus_42"));
    }

    #[test]
    fn to_authenticated_carries_tier() {
        let mut user = alice();
        user.promote("sub_1");
        let auth = user.to_authenticated();
        assert_eq!(auth.id, *user.id());
        assert!(auth.is_premium());
    }

    #[test]
    fn profile_update_errors_leave_profile_unchanged() {
        let mut user = alice();
        let before = user.profile().clone();
        let result = user.update_profile(ProfileUpdate {
            bio: Some("b".repeat(600)),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(user.profile(), &before);
    }
}
