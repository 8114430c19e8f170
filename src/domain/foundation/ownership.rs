//! Ownership trait for user-owned documents.
//!
//! Trips, posts and groups are mutated only by the user who created them.
//! Implementors expose their owner and get a uniform `Forbidden` check.
//!
//! ```ignore
//! trip.check_ownership(&user.id, "update")?;
//! ```

use super::{DomainError, ErrorCode, UserId};

/// Trait for documents that have a single owner.
pub trait OwnedByUser {
    /// Returns the ID of the user who owns this resource.
    fn owner_id(&self) -> &UserId;

    /// Noun used in the refusal message, e.g. "trip".
    fn resource_name(&self) -> &'static str;

    fn is_owner(&self, user_id: &UserId) -> bool {
        self.owner_id() == user_id
    }

    /// Returns `Forbidden` unless `user_id` owns the resource.
    fn check_ownership(&self, user_id: &UserId, action: &str) -> Result<(), DomainError> {
        if self.is_owner(user_id) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::Forbidden,
                format!(
                    "User not authorized to {} this {}.",
                    action,
                    self.resource_name()
                ),
            )
            .with_detail("owner_id", self.owner_id().to_string())
            .with_detail("requested_by", user_id.to_string()))
        }
    }
}
