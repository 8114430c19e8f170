//! Authentication middleware and extractors for axum.
//!
//! ```text
//! Request → auth_middleware → AuthenticatedUser or AuthFailure in extensions
//!                                      ↓
//!                              Handler → RequireAuth reads from extensions
//! ```
//!
//! The middleware never rejects on its own: public routes ignore a bad
//! token, protected routes report why it was bad.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::MessageBody;
use crate::adapters::http::state::AppState;
use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Why the presented token was not accepted.
#[derive(Debug, Clone)]
struct AuthFailure(AuthError);

/// Resolves `Authorization: Bearer <token>` to the stored user.
///
/// The user is re-read on every request so a deleted account or a tier
/// change is visible immediately.
pub async fn auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let token = bearer_token(&request).map(str::to_string);

    if let Some(token) = token {
        match state.authenticate_handler().handle(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user.to_authenticated());
            }
            Err(err) => {
                tracing::debug!(error = %err, "Bearer token rejected");
                request.extensions_mut().insert(AuthFailure(err));
            }
        }
    }

    next.run(request).await
}

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
                return Ok(RequireAuth(user.clone()));
            }
            Err(parts
                .extensions
                .get::<AuthFailure>()
                .map(|failure| failure.0.clone())
                .unwrap_or(AuthError::MissingToken))
        })
    }
}

/// Extractor that requires a premium caller.
#[derive(Debug, Clone)]
pub struct RequirePremium(pub AuthenticatedUser);

#[derive(Debug)]
pub enum PremiumRejection {
    Unauthenticated(AuthError),
    NotPremium,
}

impl IntoResponse for PremiumRejection {
    fn into_response(self) -> Response {
        match self {
            PremiumRejection::Unauthenticated(err) => err.into_response(),
            PremiumRejection::NotPremium => (
                StatusCode::FORBIDDEN,
                Json(MessageBody::new(
                    "Access denied: Premium subscription required for this feature.",
                )),
            )
                .into_response(),
        }
    }
}

impl<S> axum::extract::FromRequestParts<S> for RequirePremium
where
    S: Send + Sync,
{
    type Rejection = PremiumRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let RequireAuth(user) = RequireAuth::from_request_parts(parts, state)
                .await
                .map_err(PremiumRejection::Unauthenticated)?;
            if !user.is_premium() {
                return Err(PremiumRejection::NotPremium);
            }
            Ok(RequirePremium(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::FromRequestParts;
    use axum::http::Request as HttpRequest;

    use crate::domain::foundation::UserId;
    use crate::domain::user::Tier;

    fn parts() -> axum::http::request::Parts {
        HttpRequest::builder().uri("/").body(()).unwrap().into_parts().0
    }

    fn user(tier: Tier) -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new(), "alice", "a@x.com", tier)
    }

    #[tokio::test]
    async fn require_auth_without_token_reports_missing() {
        let mut parts = parts();

        let err = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert_eq!(err, AuthError::MissingToken);
    }

    #[tokio::test]
    async fn require_auth_reports_recorded_failure() {
        let mut parts = parts();
        parts.extensions.insert(AuthFailure(AuthError::TokenExpired));

        let err = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert_eq!(err, AuthError::TokenExpired);
    }

    #[tokio::test]
    async fn require_auth_returns_user() {
        let mut parts = parts();
        let alice = user(Tier::Free);
        parts.extensions.insert(alice.clone());

        let RequireAuth(found) = RequireAuth::from_request_parts(&mut parts, &()).await.unwrap();

        assert_eq!(found, alice);
    }

    #[tokio::test]
    async fn free_user_is_not_premium() {
        let mut parts = parts();
        parts.extensions.insert(user(Tier::Free));

        let err = RequirePremium::from_request_parts(&mut parts, &()).await.unwrap_err();

        assert!(matches!(err, PremiumRejection::NotPremium));
    }

    #[tokio::test]
    async fn premium_user_passes() {
        let mut parts = parts();
        parts.extensions.insert(user(Tier::Premium));

        assert!(RequirePremium::from_request_parts(&mut parts, &()).await.is_ok());
    }
}
