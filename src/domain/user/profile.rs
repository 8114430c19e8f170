//! Public profile fields of a user.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

pub const DEFAULT_PROFILE_PICTURE: &str = "/Images/default-profile.png";
pub const BIO_MAX: usize = 500;
pub const PICTURE_URL_MAX: usize = 500;
pub const MAX_TRAVEL_PREFERENCES: usize = 20;
pub const TRAVEL_PREFERENCE_MAX: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub bio: String,
    pub profile_picture_url: String,
    pub travel_preferences: Vec<String>,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            bio: String::new(),
            profile_picture_url: DEFAULT_PROFILE_PICTURE.to_string(),
            travel_preferences: Vec::new(),
        }
    }
}

/// Partial profile edit. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
    pub profile_picture_url: Option<String>,
    pub travel_preferences: Option<Vec<String>>,
}

impl Profile {
    /// Applies an edit, collecting every field error before failing.
    pub fn apply(&self, update: ProfileUpdate) -> Result<Profile, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let mut next = self.clone();

        if let Some(bio) = update.bio {
            let bio = bio.trim().to_string();
            if bio.chars().count() > BIO_MAX {
                errors.push(ValidationError::out_of_range(
                    "bio",
                    "Bio must be 500 characters or less",
                ));
            } else {
                next.bio = bio;
            }
        }

        if let Some(url) = update.profile_picture_url {
            let url = url.trim();
            if url.chars().count() > PICTURE_URL_MAX {
                errors.push(ValidationError::out_of_range(
                    "profilePictureUrl",
                    "Profile picture URL must be 500 characters or less",
                ));
            } else if url.is_empty() {
                next.profile_picture_url = DEFAULT_PROFILE_PICTURE.to_string();
            } else {
                next.profile_picture_url = url.to_string();
            }
        }

        if let Some(preferences) = update.travel_preferences {
            let cleaned: Vec<String> = preferences
                .iter()
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect();
            if cleaned.len() > MAX_TRAVEL_PREFERENCES {
                errors.push(ValidationError::out_of_range(
                    "travelPreferences",
                    "At most 20 travel preferences are allowed",
                ));
            } else if cleaned
                .iter()
                .any(|p| p.chars().count() > TRAVEL_PREFERENCE_MAX)
            {
                errors.push(ValidationError::out_of_range(
                    "travelPreferences",
                    "Each travel preference must be 50 characters or less",
                ));
            } else {
                next.travel_preferences = cleaned;
            }
        }

        if errors.is_empty() {
            Ok(next)
        } else {
            Err(errors)
        }
    }
}
