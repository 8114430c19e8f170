//! Password hashing port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Salted one-way password hashing.
///
/// Implementations are CPU bound and must not block the async runtime.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &str) -> Result<String, DomainError>;

    /// Returns false on mismatch; errors only when the stored hash is unusable.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError>;
}
