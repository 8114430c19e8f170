//! Application error taxonomy.
//!
//! Handlers return `AppError`; the HTTP adapter owns the single mapping to
//! status codes and bodies. Lower layers convert in through `From`.

use thiserror::Error;

use crate::domain::foundation::{AuthError, DomainError, ErrorCode, ValidationError};
use crate::domain::search::SearchQueryError;
use crate::ports::{PaymentError, SearchError};

/// A field-level validation failure reported to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub msg: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            msg: msg.into(),
        }
    }
}

impl From<ValidationError> for FieldError {
    fn from(err: ValidationError) -> Self {
        FieldError::new(err.field(), err.message())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("{0}")]
    BadRequest(String),

    /// A uniqueness clash; rendered in the `errors` envelope.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    ConcurrentModification(String),

    /// An upstream API answered with an error; its status is mirrored.
    #[error("{msg}")]
    Upstream {
        status: u16,
        msg: String,
        details: serde_json::Value,
    },

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        AppError::BadRequest(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        AppError::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// One field error.
    pub fn field(field: impl Into<String>, msg: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, msg)])
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::ValidationFailed => {
                let field = err.detail("field").unwrap_or_default().to_string();
                AppError::Validation(vec![FieldError::new(field, err.message)])
            }
            code if code.is_not_found() => AppError::NotFound(err.message),
            ErrorCode::Duplicate => AppError::Conflict(err.message),
            ErrorCode::ConcurrentModification => AppError::ConcurrentModification(err.message),
            ErrorCode::RuleViolation => AppError::BadRequest(err.message),
            ErrorCode::Unauthorized => AppError::Unauthenticated(err.message),
            ErrorCode::Forbidden => AppError::Forbidden(err.message),
            _ => AppError::Internal(err.to_string()),
        }
    }
}

impl From<Vec<ValidationError>> for AppError {
    fn from(errors: Vec<ValidationError>) -> Self {
        AppError::Validation(errors.into_iter().map(FieldError::from).collect())
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(vec![err.into()])
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::ServiceUnavailable(msg) => AppError::Internal(msg),
            other => AppError::Unauthenticated(other.to_string()),
        }
    }
}

impl From<SearchQueryError> for AppError {
    fn from(err: SearchQueryError) -> Self {
        match err {
            SearchQueryError::Missing(msg) => AppError::BadRequest(msg.to_string()),
            SearchQueryError::Invalid(errors) => errors.into(),
        }
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        let msg = err.to_string();
        match err {
            SearchError::Upstream { status, details, .. } => AppError::Upstream {
                status,
                msg,
                details,
            },
            SearchError::NoResponse { .. } => AppError::Upstream {
                status: 500,
                msg,
                details: serde_json::Value::Null,
            },
            SearchError::Request { .. } => AppError::Internal(msg),
        }
    }
}

impl From<PaymentError> for AppError {
    fn from(err: PaymentError) -> Self {
        AppError::Internal(err.to_string())
    }
}
