//! Registration and login input value objects.

use once_cell::sync::Lazy;
use regex::Regex;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;

use crate::domain::foundation::ValidationError;

pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 50;
pub const PASSWORD_MIN: usize = 6;

static USERNAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("static regex"));

static EMAIL_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"));

const PASSWORD_SPECIALS: &str = r#"!@#$%^&*()_+-=[]{};':"\|,.<>/?"#;

/// A trimmed username of 3-50 letters, digits or underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        let len = trimmed.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
            return Err(ValidationError::out_of_range(
                "username",
                "Username must be between 3 and 50 characters",
            ));
        }
        if !USERNAME_CHARS.is_match(trimmed) {
            return Err(ValidationError::invalid_format(
                "username",
                "Username can only contain letters, numbers, and underscores",
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A normalized (trimmed, lower-cased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let normalized = raw.trim().to_lowercase();
        if !EMAIL_SHAPE.is_match(&normalized) {
            return Err(ValidationError::invalid_format(
                "email",
                "Please provide a valid email",
            ));
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A plaintext password that passed the strength rules.
///
/// Held as a secret so it never shows up in logs or debug output.
pub struct NewPassword(SecretString);

impl NewPassword {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.chars().count() < PASSWORD_MIN {
            return Err(ValidationError::out_of_range(
                "password",
                "Password must be at least 6 characters long",
            ));
        }
        let has_upper = raw.chars().any(|c| c.is_ascii_uppercase());
        let has_digit = raw.chars().any(|c| c.is_ascii_digit());
        let has_special = raw.chars().any(|c| PASSWORD_SPECIALS.contains(c));
        if !(has_upper && has_digit && has_special) {
            return Err(ValidationError::invalid_format(
                "password",
                "Password must contain at least one uppercase letter, one number, and one special character",
            ));
        }
        Ok(Self(SecretString::new(raw.to_string())))
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl fmt::Debug for NewPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("NewPassword([REDACTED])")
    }
}

/// Login password: only presence is checked.
pub fn require_password(raw: &str) -> Result<SecretString, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::empty_field("password", "Password is required"));
    }
    Ok(SecretString::new(raw.to_string()))
}
