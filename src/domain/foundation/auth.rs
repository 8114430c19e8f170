//! Authentication types for the domain layer.
//!
//! `AuthenticatedUser` is the caller identity resolved for a request: the
//! token subject re-fetched from the user store, so a deleted account or a
//! tier change is visible on the very next request.

use super::UserId;
use crate::domain::user::Tier;
use thiserror::Error;

/// Caller identity attached to a request after token validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub tier: Tier,
}

impl AuthenticatedUser {
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>, tier: Tier) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            tier,
        }
    }

    pub fn is_premium(&self) -> bool {
        self.tier == Tier::Premium
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// No bearer token was presented.
    #[error("Not authorized, no token")]
    MissingToken,

    /// The token is malformed or has an invalid signature.
    #[error("Not authorized, token failed")]
    InvalidToken,

    /// The token was well-formed but has expired.
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but the user no longer exists in the system.
    #[error("Not authorized, user not found")]
    UserNotFound,

    /// The user store could not be reached.
    #[error("Authentication service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    pub fn is_client_error(&self) -> bool {
        !matches!(self, AuthError::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn premium_flag_follows_tier() {
        let user = AuthenticatedUser::new(UserId::new(), "alice", "a@x.com", Tier::Premium);
        assert!(user.is_premium());

        let user = AuthenticatedUser::new(UserId::new(), "bob", "b@x.com", Tier::Free);
        assert!(!user.is_premium());
    }

    #[test]
    fn auth_error_messages_are_client_facing() {
        assert_eq!(AuthError::MissingToken.to_string(), "Not authorized, no token");
        assert_eq!(AuthError::InvalidToken.to_string(), "Not authorized, token failed");
        assert_eq!(AuthError::UserNotFound.to_string(), "Not authorized, user not found");
    }

    #[test]
    fn service_unavailable_is_not_a_client_error() {
        assert!(AuthError::TokenExpired.is_client_error());
        assert!(!AuthError::ServiceUnavailable("db down".into()).is_client_error());
    }
}
