//! User repository port.
//!
//! Username, email and referral code are unique; implementations report a
//! collision as `ErrorCode::Duplicate` naming the field.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user.
    ///
    /// # Errors
    ///
    /// - `Duplicate` when username, email or referral code is taken
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, user: &User) -> Result<(), DomainError>;

    /// Persist changes if the stored version still equals `user.version()`.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` when the stored version moved on
    /// - `UserNotFound` when the user was deleted
    /// - `Duplicate` when an assigned referral code collides
    async fn update(&self, user: &User) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Lookup by lower-cased email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    async fn find_by_referral_code(&self, code: &str) -> Result<Option<User>, DomainError>;
}
