//! AuthenticateHandler - resolves a bearer token to a live user.

use std::sync::Arc;

use tracing::{debug, error};

use crate::domain::foundation::AuthError;
use crate::domain::user::User;
use crate::ports::{TokenService, UserRepository};

/// Verifies the token and re-fetches its subject, so deleted accounts and
/// tier changes take effect on the next request.
pub struct AuthenticateHandler {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenService>,
}

impl AuthenticateHandler {
    pub fn new(users: Arc<dyn UserRepository>, tokens: Arc<dyn TokenService>) -> Self {
        Self { users, tokens }
    }

    pub async fn handle(&self, token: &str) -> Result<User, AuthError> {
        let user_id = self.tokens.verify(token)?;

        match self.users.find_by_id(&user_id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                debug!(user_id = %user_id, "Token subject no longer exists");
                Err(AuthError::UserNotFound)
            }
            Err(err) => {
                error!(user_id = %user_id, error = %err, "User lookup failed during authentication");
                Err(AuthError::ServiceUnavailable(err.message))
            }
        }
    }
}
