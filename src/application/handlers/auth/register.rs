//! RegisterUserHandler - creates an account and issues its first token.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::AppError;
use crate::domain::foundation::UserId;
use crate::domain::referral::Referral;
use crate::domain::user::{Email, NewPassword, ReferralCode, User, Username};
use crate::ports::{IssuedToken, PasswordHasher, ReferralRepository, TokenService, UserRepository};

/// Command to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub username: String,
    pub email: String,
    pub password: String,
    pub referral_code: Option<String>,
}

/// Result of a successful registration.
#[derive(Debug, Clone)]
pub struct RegisterUserResult {
    pub user: User,
    pub token: IssuedToken,
}

/// Handler for account registration.
///
/// A referral code that resolves to an existing user records a pending
/// referral; any other code is ignored.
pub struct RegisterUserHandler {
    users: Arc<dyn UserRepository>,
    referrals: Arc<dyn ReferralRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl RegisterUserHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        referrals: Arc<dyn ReferralRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            referrals,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: RegisterUserCommand) -> Result<RegisterUserResult, AppError> {
        // 1. Field validation, all errors at once
        let mut errors = Vec::new();
        let username = Username::parse(&cmd.username).map_err(|e| errors.push(e)).ok();
        let email = Email::parse(&cmd.email).map_err(|e| errors.push(e)).ok();
        let password = NewPassword::parse(&cmd.password).map_err(|e| errors.push(e)).ok();
        let (Some(username), Some(email), Some(password)) = (username, email, password) else {
            return Err(errors.into());
        };

        // 2. Friendly duplicate checks; the unique indexes still back them up
        if self.users.find_by_email(email.as_str()).await?.is_some() {
            return Err(AppError::Conflict("User already exists with this email".into()));
        }
        if self.users.find_by_username(username.as_str()).await?.is_some() {
            return Err(AppError::Conflict("Username is already taken".into()));
        }

        let referrer = match cmd.referral_code.as_deref() {
            Some(raw) => self.resolve_referrer(raw).await?,
            None => None,
        };

        // 3. Persist
        let hash = self.hasher.hash(password.expose()).await?;
        let user = User::register(UserId::new(), username, email, hash, referrer);
        self.users.insert(&user).await?;

        if let Some(referrer_id) = referrer {
            let referral = Referral::pending(referrer_id, *user.id());
            if let Err(err) = self.referrals.insert(&referral).await {
                warn!(
                    user_id = %user.id(),
                    referrer_id = %referrer_id,
                    error = %err,
                    "Failed to record referral"
                );
            }
        }

        // 4. Token
        let token = self.tokens.issue(user.id())?;
        info!(user_id = %user.id(), referred = referrer.is_some(), "User registered");

        Ok(RegisterUserResult { user, token })
    }

    async fn resolve_referrer(&self, raw: &str) -> Result<Option<UserId>, AppError> {
        let Ok(code) = ReferralCode::parse(raw) else {
            return Ok(None);
        };
        Ok(self
            .users
            .find_by_referral_code(code.as_str())
            .await?
            .map(|u| *u.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryReferralRepository, InMemoryUserRepository};
    use crate::application::handlers::auth::fixtures;
    use crate::application::handlers::test_support::seed_user;
    use crate::domain::referral::ReferralStatus;

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        referrals: Arc<InMemoryReferralRepository>,
        handler: RegisterUserHandler,
    }

    fn fixture() -> Fixture {
        let users = Arc::new(InMemoryUserRepository::new());
        let referrals = Arc::new(InMemoryReferralRepository::new());
        let handler = RegisterUserHandler::new(
            users.clone(),
            referrals.clone(),
            fixtures::hasher(),
            fixtures::tokens(),
        );
        Fixture {
            users,
            referrals,
            handler,
        }
    }

    fn command(username: &str, email: &str) -> RegisterUserCommand {
        RegisterUserCommand {
            username: username.into(),
            email: email.into(),
            password: "Abc123!".into(),
            referral_code: None,
        }
    }

    #[tokio::test]
    async fn registers_user_and_issues_token() {
        let f = fixture();

        let result = f.handler.handle(command("alice", " A@X.com ")).await.unwrap();

        assert_eq!(result.user.email(), "a@x.com");
        assert!(!result.token.token.is_empty());
        assert_ne!(result.user.password_hash(), "Abc123!");
        let stored = f.users.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.id(), result.user.id());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict_and_creates_nothing() {
        let f = fixture();
        f.handler.handle(command("alice", "a@x.com")).await.unwrap();

        let err = f.handler.handle(command("alice2", "a@x.com")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref m) if m == "User already exists with this email"));
        assert_eq!(f.users.len().await, 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_a_conflict() {
        let f = fixture();
        f.handler.handle(command("alice", "a@x.com")).await.unwrap();

        let err = f.handler.handle(command("alice", "b@x.com")).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(ref m) if m == "Username is already taken"));
    }

    #[tokio::test]
    async fn reports_every_invalid_field() {
        let f = fixture();
        let cmd = RegisterUserCommand {
            username: "a!".into(),
            email: "nope".into(),
            password: "short".into(),
            referral_code: None,
        };

        match f.handler.handle(cmd).await.unwrap_err() {
            AppError::Validation(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["username", "email", "password"]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn valid_referral_code_records_pending_referral() {
        let f = fixture();
        let mut referrer = seed_user(&f.users, "bob").await;
        referrer.assign_referral_code(ReferralCode::parse("ab12cd").unwrap());
        f.users.update(&referrer).await.unwrap();

        let mut cmd = command("alice", "a@x.com");
        cmd.referral_code = Some("AB12CD".into());
        let result = f.handler.handle(cmd).await.unwrap();

        assert_eq!(result.user.referred_by(), Some(referrer.id()));
        let referral = f
            .referrals
            .find_pending_for_referred(result.user.id())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(referral.referrer_id(), referrer.id());
        assert_eq!(referral.status(), ReferralStatus::Pending);
    }

    #[tokio::test]
    async fn unknown_referral_code_is_ignored() {
        let f = fixture();
        let mut cmd = command("alice", "a@x.com");
        cmd.referral_code = Some("FFFFFF".into());

        let result = f.handler.handle(cmd).await.unwrap();

        assert!(result.user.referred_by().is_none());
        assert!(f
            .referrals
            .find_pending_for_referred(result.user.id())
            .await
            .unwrap()
            .is_none());
    }
}
