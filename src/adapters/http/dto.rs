//! Response pieces shared across route modules.

use serde::Serialize;

use crate::application::handlers::UserSummary;
use crate::domain::foundation::UserId;

/// Public user card embedded in posts and groups.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCard {
    pub id: UserId,
    pub username: String,
    pub profile_picture_url: String,
}

impl From<UserSummary> for UserCard {
    fn from(summary: UserSummary) -> Self {
        Self {
            id: summary.id,
            username: summary.username,
            profile_picture_url: summary.profile_picture_url,
        }
    }
}
