//! Shareable referral codes.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::domain::foundation::ValidationError;

/// Number of random bytes behind a code; each byte renders as two hex digits.
const CODE_BYTES: usize = 3;

/// Six uppercase hexadecimal characters, unique across users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Draws a fresh random code. The webhook reconciler redraws until no
    /// stored user holds it.
    pub fn generate() -> Self {
        let random = Uuid::new_v4();
        Self(hex::encode_upper(&random.as_bytes()[..CODE_BYTES]))
    }

    /// Accepts user-supplied input, tolerating case and surrounding space.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_uppercase();
        let valid = normalized.len() == CODE_BYTES * 2
            && normalized.chars().all(|c| c.is_ascii_hexdigit());
        if !valid {
            return Err(ValidationError::invalid_format(
                "referralCode",
                "Referral code must be 6 hexadecimal characters",
            ));
        }
        Ok(Self(normalized))
    }

    /// Wraps a stored value without re-validating it.
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
