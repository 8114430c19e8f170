//! Request and response bodies for identity endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Timestamp, UserId};
use crate::domain::user::{ProfileUpdate, Tier, User};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub travel_preferences: Option<Vec<String>>,
}

impl From<UpdateProfileRequest> for ProfileUpdate {
    fn from(req: UpdateProfileRequest) -> Self {
        ProfileUpdate {
            bio: req.bio,
            profile_picture_url: req.profile_picture_url,
            travel_preferences: req.travel_preferences,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// The caller's own account view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub user_tier: Tier,
    pub profile_picture_url: String,
    pub bio: String,
    pub travel_preferences: Vec<String>,
    pub referral_code: Option<String>,
    pub created_at: Timestamp,
}

impl From<&User> for MeResponse {
    fn from(user: &User) -> Self {
        let profile = user.profile();
        Self {
            id: *user.id(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            user_tier: user.tier(),
            profile_picture_url: profile.profile_picture_url.clone(),
            bio: profile.bio.clone(),
            travel_preferences: profile.travel_preferences.clone(),
            referral_code: user.referral_code().map(|c| c.as_str().to_string()),
            created_at: *user.created_at(),
        }
    }
}

/// What anyone may see about a user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfileResponse {
    pub id: UserId,
    pub username: String,
    pub profile_picture_url: String,
    pub bio: String,
    pub travel_preferences: Vec<String>,
    pub member_since: Timestamp,
}

impl From<&User> for PublicProfileResponse {
    fn from(user: &User) -> Self {
        let profile = user.profile();
        Self {
            id: *user.id(),
            username: user.username().to_string(),
            profile_picture_url: profile.profile_picture_url.clone(),
            bio: profile.bio.clone(),
            travel_preferences: profile.travel_preferences.clone(),
            member_since: *user.created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{Email, Username};

    #[test]
    fn me_response_never_carries_password_hash() {
        let user = User::register(
            UserId::new(),
            Username::parse("alice").unwrap(),
            Email::parse("a@x.com").unwrap(),
            "$2b$10$secret".into(),
            None,
        );

        let json = serde_json::to_value(MeResponse::from(&user)).unwrap();

        assert_eq!(json["userTier"], "free");
        assert_eq!(json["referralCode"], serde_json::Value::Null);
        assert!(!json.to_string().contains("$2b$10$secret"));
    }

    #[test]
    fn register_request_reads_camel_case_referral() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"username":"a","email":"b","password":"c","referralCode":"AB12CD"}"#)
                .unwrap();
        assert_eq!(req.referral_code.as_deref(), Some("AB12CD"));
    }
}
