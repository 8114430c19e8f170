//! Application layer - use-case handlers and the error taxonomy they share.
//!
//! Handlers orchestrate domain operations through ports. Commands mutate,
//! queries read; both return `AppError` on failure.

pub mod error;
pub mod handlers;

pub use error::{AppError, FieldError};
