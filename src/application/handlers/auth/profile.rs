//! Profile read and edit handlers.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::UserId;
use crate::domain::user::{ProfileUpdate, User};
use crate::ports::UserRepository;

const USER_NOT_FOUND: &str = "User not found.";

/// Loads a user for `/me` and the public profile card.
pub struct GetUserProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, user_id: UserId) -> Result<User, AppError> {
        self.users
            .find_by_id(&user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateProfileCommand {
    pub user_id: UserId,
    pub update: ProfileUpdate,
}

pub struct UpdateProfileHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateProfileHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateProfileCommand) -> Result<User, AppError> {
        let mut user = self
            .users
            .find_by_id(&cmd.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(USER_NOT_FOUND))?;

        user.update_profile(cmd.update)?;
        self.users.update(&user).await?;

        info!(user_id = %cmd.user_id, "Profile updated");
        let version = user.version() + 1;
        Ok(user.with_version(version))
    }
}
