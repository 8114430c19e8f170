//! HS256 bearer tokens.
//!
//! Claims follow the shape existing clients decode:
//!
//! ```json
//! { "user": { "id": "<uuid>" }, "iat": 1700000000, "exp": 1700018000 }
//! ```

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, Timestamp, UserId};
use crate::ports::{IssuedToken, TokenService};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user: ClaimsUser,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClaimsUser {
    id: String,
}

/// Signs and verifies tokens with a shared secret.
pub struct JwtTokenService {
    secret: SecretString,
    ttl_hours: i64,
}

impl JwtTokenService {
    pub fn new(secret: impl Into<String>, ttl_hours: i64) -> Self {
        Self {
            secret: SecretString::new(secret.into()),
            ttl_hours,
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.jwt_secret.clone(), config.token_ttl_hours)
    }

    fn issue_at(&self, user_id: &UserId, now: Timestamp) -> Result<IssuedToken, AuthError> {
        let expires_at = now.add_hours(self.ttl_hours);
        let claims = Claims {
            user: ClaimsUser {
                id: user_id.to_string(),
            },
            iat: now.as_unix_secs(),
            exp: expires_at.as_unix_secs(),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.expose_secret().as_bytes()),
        )
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            AuthError::ServiceUnavailable("token signing failed".to_string())
        })?;
        Ok(IssuedToken { token, expires_at })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &UserId) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, Timestamp::now())
    }

    fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.expose_secret().as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => {
                tracing::debug!(error = %e, "Rejected bearer token");
                AuthError::InvalidToken
            }
        })?;

        data.claims
            .user
            .id
            .parse()
            .map_err(|_| AuthError::InvalidToken)
    }
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("ttl_hours", &self.ttl_hours)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtTokenService {
        JwtTokenService::new("test-secret", 5)
    }

    #[test]
    fn issued_token_round_trips_to_the_user_id() {
        let user_id = UserId::new();
        let issued = service().issue(&user_id).unwrap();
        assert_eq!(service().verify(&issued.token).unwrap(), user_id);
    }

    #[test]
    fn token_expires_five_hours_after_issue() {
        let now = Timestamp::now();
        let issued = service().issue_at(&UserId::new(), now).unwrap();
        assert_eq!(
            issued.expires_at.as_unix_secs() - now.as_unix_secs(),
            5 * 3600
        );
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let long_ago = Timestamp::now().add_hours(-10);
        let issued = service().issue_at(&UserId::new(), long_ago).unwrap();
        assert_eq!(service().verify(&issued.token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn token_signed_with_another_secret_is_invalid() {
        let issued = JwtTokenService::new("other-secret", 5)
            .issue(&UserId::new())
            .unwrap();
        assert_eq!(service().verify(&issued.token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn tampered_or_garbage_tokens_are_invalid() {
        let issued = service().issue(&UserId::new()).unwrap();
        let mut tampered = issued.token.clone();
        tampered.push('x');
        assert_eq!(service().verify(&tampered), Err(AuthError::InvalidToken));
        assert_eq!(service().verify("not-a-jwt"), Err(AuthError::InvalidToken));
    }
}
