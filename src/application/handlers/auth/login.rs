//! LoginHandler - exchanges credentials for a bearer token.

use std::sync::Arc;

use secrecy::ExposeSecret;
use tracing::{debug, info};

use crate::application::AppError;
use crate::domain::user::{require_password, Email, User};
use crate::ports::{IssuedToken, PasswordHasher, TokenService, UserRepository};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

#[derive(Debug, Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub token: IssuedToken,
}

/// Handler for credential login.
///
/// An unknown email and a wrong password are indistinguishable to the caller.
pub struct LoginHandler {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
}

impl LoginHandler {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    pub async fn handle(&self, cmd: LoginCommand) -> Result<LoginResult, AppError> {
        let mut errors = Vec::new();
        let email = Email::parse(&cmd.email).map_err(|e| errors.push(e)).ok();
        let password = require_password(&cmd.password).map_err(|e| errors.push(e)).ok();
        let (Some(email), Some(password)) = (email, password) else {
            return Err(errors.into());
        };

        let Some(user) = self.users.find_by_email(email.as_str()).await? else {
            debug!(email = %email, "Login for unknown email");
            return Err(AppError::Conflict(INVALID_CREDENTIALS.into()));
        };

        if !self
            .hasher
            .verify(password.expose_secret(), user.password_hash())
            .await?
        {
            debug!(user_id = %user.id(), "Login with wrong password");
            return Err(AppError::Conflict(INVALID_CREDENTIALS.into()));
        }

        let token = self.tokens.issue(user.id())?;
        info!(user_id = %user.id(), "User logged in");
        Ok(LoginResult { user, token })
    }
}
