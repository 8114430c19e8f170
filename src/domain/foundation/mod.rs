//! Foundation module - Shared domain primitives.
//!
//! Identifiers, timestamps, paging and the error vocabulary shared by
//! every document type.

mod auth;
mod errors;
mod ids;
mod ownership;
mod pagination;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{GroupId, PostId, ReferralId, SubscriptionId, TripId, UserId};
pub use ownership::OwnedByUser;
pub use pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use timestamp::Timestamp;
