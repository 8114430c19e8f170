use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;
use crate::ports::UserRepository;

use super::check_version;

/// HashMap-backed user store with unique email, username and referral code.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Finds the first unique key `candidate` shares with another stored user.
fn collision(users: &HashMap<UserId, User>, candidate: &User) -> Option<&'static str> {
    users
        .values()
        .filter(|u| u.id() != candidate.id())
        .find_map(|u| {
            if u.email() == candidate.email() {
                Some("email")
            } else if u.username() == candidate.username() {
                Some("username")
            } else if u.referral_code().is_some() && u.referral_code() == candidate.referral_code() {
                Some("referral code")
            } else {
                None
            }
        })
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.id()) {
            return Err(DomainError::duplicate("id"));
        }
        if let Some(field) = collision(&users, user) {
            return Err(DomainError::duplicate(field));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        let stored_version = match users.get(user.id()) {
            Some(stored) => stored.version(),
            None => return Err(DomainError::concurrent_modification("User")),
        };
        check_version("User", stored_version, user.version())?;
        if let Some(field) = collision(&users, user) {
            return Err(DomainError::duplicate(field));
        }
        users.insert(*user.id(), user.clone().with_version(stored_version + 1));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email() == email)
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username() == username)
            .cloned())
    }

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, DomainError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.referral_code().map(|c| c.as_str()) == Some(code))
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::user::{Email, ReferralCode, Username};

    fn user(name: &str, email: &str) -> User {
        User::register(
            UserId::new(),
            Username::parse(name).unwrap(),
            Email::parse(email).unwrap(),
            "hash".to_string(),
            None,
        )
    }

    #[tokio::test]
    async fn rejects_duplicate_email_and_username() {
        let repo = InMemoryUserRepository::new();
        repo.insert(&user("alice", "a@x.com")).await.unwrap();

        let err = repo.insert(&user("other", "A@x.com")).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert_eq!(err.message, "Email already exists");

        let err = repo.insert(&user("alice", "b@x.com")).await.unwrap_err();
        assert_eq!(err.message, "Username already exists");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_increments_version_and_rejects_stale_copies() {
        let repo = InMemoryUserRepository::new();
        let alice = user("alice", "a@x.com");
        repo.insert(&alice).await.unwrap();

        let mut first = repo.find_by_id(alice.id()).await.unwrap().unwrap();
        let mut second = first.clone();

        first.attach_customer("cus_1");
        repo.update(&first).await.unwrap();
        let stored = repo.find_by_id(alice.id()).await.unwrap().unwrap();
        assert_eq!(stored.version(), 2);

        second.attach_customer("cus_2");
        let err = repo.update(&second).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ConcurrentModification);
        let stored = repo.find_by_id(alice.id()).await.unwrap().unwrap();
        assert_eq!(stored.stripe_customer_id(), Some("cus_1"));
    }

    #[tokio::test]
    async fn finds_by_email_case_insensitively_and_by_referral_code() {
        let repo = InMemoryUserRepository::new();
        let mut alice = user("alice", "a@x.com");
        alice.assign_referral_code(ReferralCode::from_stored("ABC123".to_string()));
        repo.insert(&alice).await.unwrap();

        assert!(repo.find_by_email(" A@X.COM ").await.unwrap().is_some());
        assert!(repo.find_by_username("alice").await.unwrap().is_some());
        let found = repo.find_by_referral_code("ABC123").await.unwrap().unwrap();
        assert_eq!(found.id(), alice.id());
        assert!(repo.find_by_referral_code("FFFFFF").await.unwrap().is_none());
    }
}
