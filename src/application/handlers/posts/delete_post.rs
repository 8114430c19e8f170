use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{OwnedByUser, PostId, UserId};
use crate::ports::PostRepository;

use super::find_post;

/// Deletes a post after the owner check.
pub struct DeletePostHandler {
    posts: Arc<dyn PostRepository>,
}

impl DeletePostHandler {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    pub async fn handle(&self, user_id: UserId, post_id: PostId) -> Result<(), AppError> {
        let post = find_post(self.posts.as_ref(), &post_id).await?;
        post.check_ownership(&user_id, "delete")?;
        self.posts.delete(&post_id).await?;

        info!(post_id = %post_id, user_id = %user_id, "Post deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryPostRepository;
    use crate::application::handlers::posts::fixtures::seed_post;

    #[tokio::test]
    async fn owner_deletes_and_stranger_cannot() {
        let posts = Arc::new(InMemoryPostRepository::new());
        let owner = UserId::new();
        let post = seed_post(&posts, owner, "bye").await;
        let handler = DeletePostHandler::new(posts.clone());

        let err = handler.handle(UserId::new(), *post.id()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        handler.handle(owner, *post.id()).await.unwrap();
        assert!(posts.find_by_id(post.id()).await.unwrap().is_none());
    }
}
