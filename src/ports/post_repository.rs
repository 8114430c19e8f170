//! Social post repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, Page, PageRequest, PostId, UserId};
use crate::domain::social::Post;

#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn insert(&self, post: &Post) -> Result<(), DomainError>;

    /// Persist changes if the stored version still equals `post.version()`.
    async fn update(&self, post: &Post) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `PostNotFound` if nothing was deleted
    async fn delete(&self, id: &PostId) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError>;

    /// All posts, newest first.
    async fn list(&self, page: PageRequest) -> Result<Page<Post>, DomainError>;

    /// Posts by one author, newest first.
    async fn list_by_user(&self, user_id: &UserId, page: PageRequest) -> Result<Page<Post>, DomainError>;
}
