//! Travel group repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, GroupId, Page, PageRequest, UserId};
use crate::domain::group::TravelGroup;

#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// # Errors
    ///
    /// - `Duplicate` (field `name`) when the group name is taken
    async fn insert(&self, group: &TravelGroup) -> Result<(), DomainError>;

    /// Persist changes if the stored version still equals `group.version()`.
    ///
    /// # Errors
    ///
    /// - `ConcurrentModification` when the stored version moved on
    /// - `Duplicate` when a rename collides
    async fn update(&self, group: &TravelGroup) -> Result<(), DomainError>;

    async fn delete(&self, id: &GroupId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &GroupId) -> Result<Option<TravelGroup>, DomainError>;

    /// All groups, newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<TravelGroup>, DomainError>;

    /// Groups created by `creator`, newest first.
    async fn list_by_creator(
        &self,
        creator: &UserId,
        page: PageRequest,
    ) -> Result<Page<TravelGroup>, DomainError>;
}
