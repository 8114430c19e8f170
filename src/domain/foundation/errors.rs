//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
///
/// The display text is the message shown to API clients, so it is
/// phrased for an end user rather than an operator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{message}")]
    EmptyField { field: String, message: String },

    #[error("{message}")]
    OutOfRange { field: String, message: String },

    #[error("{message}")]
    InvalidFormat { field: String, message: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::EmptyField {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn out_of_range(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Name of the offending request field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ValidationError::EmptyField { message, .. }
            | ValidationError::OutOfRange { message, .. }
            | ValidationError::InvalidFormat { message, .. } => message,
        }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    UserNotFound,
    TripNotFound,
    PostNotFound,
    GroupNotFound,
    SubscriptionNotFound,
    SavedItemNotFound,

    // State errors
    Duplicate,
    ConcurrentModification,
    RuleViolation,

    // Authorization errors
    Unauthorized,
    Forbidden,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::UserNotFound
                | ErrorCode::TripNotFound
                | ErrorCode::PostNotFound
                | ErrorCode::GroupNotFound
                | ErrorCode::SubscriptionNotFound
                | ErrorCode::SavedItemNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::TripNotFound => "TRIP_NOT_FOUND",
            ErrorCode::PostNotFound => "POST_NOT_FOUND",
            ErrorCode::GroupNotFound => "GROUP_NOT_FOUND",
            ErrorCode::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            ErrorCode::SavedItemNotFound => "SAVED_ITEM_NOT_FOUND",
            ErrorCode::Duplicate => "DUPLICATE",
            ErrorCode::ConcurrentModification => "CONCURRENT_MODIFICATION",
            ErrorCode::RuleViolation => "RULE_VIOLATION",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a validation error for a specific field.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    /// A unique index rejected the write. `field` names the colliding value.
    pub fn duplicate(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(ErrorCode::Duplicate, format!("{} already exists", capitalize(&field)))
            .with_detail("field", field)
    }

    /// The stored version moved on since the document was read.
    pub fn concurrent_modification(entity: &str) -> Self {
        Self::new(
            ErrorCode::ConcurrentModification,
            format!("{} was modified concurrently, please retry", entity),
        )
    }

    /// A business rule refused the request, e.g. joining a group twice.
    pub fn rule(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RuleViolation, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    pub fn detail(&self, key: &str) -> Option<&str> {
        self.details.get(key).map(String::as_str)
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::validation(err.field().to_string(), err.message().to_string())
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_user_message() {
        let err = ValidationError::out_of_range("tripName", "Trip name must be 1-100 characters");
        assert_eq!(err.to_string(), "Trip name must be 1-100 characters");
        assert_eq!(err.field(), "tripName");
    }

    #[test]
    fn domain_error_displays_code_and_message() {
        let err = DomainError::new(ErrorCode::TripNotFound, "Trip not found");
        assert_eq!(format!("{}", err), "[TRIP_NOT_FOUND] Trip not found");
    }

    #[test]
    fn duplicate_error_names_the_field() {
        let err = DomainError::duplicate("email");
        assert_eq!(err.code, ErrorCode::Duplicate);
        assert_eq!(err.message, "Email already exists");
        assert_eq!(err.detail("field"), Some("email"));
    }

    #[test]
    fn validation_error_converts_with_field_detail() {
        let err: DomainError =
            ValidationError::invalid_format("endDate", "End date must be after start date").into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(err.detail("field"), Some("endDate"));
    }

    #[test]
    fn not_found_codes_are_grouped() {
        assert!(ErrorCode::GroupNotFound.is_not_found());
        assert!(!ErrorCode::Duplicate.is_not_found());
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(ErrorCode::ConcurrentModification.to_string(), "CONCURRENT_MODIFICATION");
        assert_eq!(ErrorCode::InternalError.to_string(), "INTERNAL_ERROR");
    }
}
