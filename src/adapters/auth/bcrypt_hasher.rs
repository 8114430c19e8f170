//! bcrypt password hashing on the blocking thread pool.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::PasswordHasher;

#[derive(Debug, Clone, Copy)]
pub struct BcryptPasswordHasher {
    cost: u32,
}

impl BcryptPasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

fn internal(message: impl Into<String>) -> DomainError {
    DomainError::new(ErrorCode::InternalError, message)
}

#[async_trait]
impl PasswordHasher for BcryptPasswordHasher {
    async fn hash(&self, password: &str) -> Result<String, DomainError> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| internal(format!("hashing task failed: {}", e)))?
            .map_err(|e| internal(format!("bcrypt hash failed: {}", e)))
    }

    async fn verify(&self, password: &str, hash: &str) -> Result<bool, DomainError> {
        let password = password.to_string();
        let hash = hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| internal(format!("verification task failed: {}", e)))?
            .map_err(|e| internal(format!("stored hash unusable: {}", e)))
    }
}
