//! Bearer token port.
//!
//! Tokens only carry the user id; the caller's identity is re-read from
//! the user store on every request.

use crate::domain::foundation::{AuthError, Timestamp, UserId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: Timestamp,
}

pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: &UserId) -> Result<IssuedToken, AuthError>;

    /// Returns the subject of a valid, unexpired token.
    ///
    /// # Errors
    ///
    /// - `TokenExpired` when `exp` has passed
    /// - `InvalidToken` for any other defect
    fn verify(&self, token: &str) -> Result<UserId, AuthError>;
}
