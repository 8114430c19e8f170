use std::sync::Arc;

use crate::application::AppError;
use crate::domain::foundation::PostId;
use crate::ports::{PostRepository, UserRepository};

use super::{find_post, with_author, PostView};

/// Public single-post read.
pub struct GetPostHandler {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl GetPostHandler {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn handle(&self, post_id: PostId) -> Result<PostView, AppError> {
        let post = find_post(self.posts.as_ref(), &post_id).await?;
        with_author(self.users.as_ref(), post).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPostRepository, InMemoryUserRepository};
    use crate::application::handlers::posts::fixtures::seed_post;
    use crate::application::handlers::test_support::seed_user;

    #[tokio::test]
    async fn fetches_text_and_author_by_id() {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let alice = seed_user(&users, "alice").await;
        let post = seed_post(&posts, *alice.id(), "Night train to Vienna").await;

        let view = GetPostHandler::new(posts, users).handle(*post.id()).await.unwrap();

        assert_eq!(view.post.text(), "Night train to Vienna");
        assert_eq!(view.author.map(|a| a.id), Some(*alice.id()));
    }

    #[tokio::test]
    async fn unknown_post_is_not_found() {
        let handler = GetPostHandler::new(
            Arc::new(InMemoryPostRepository::new()),
            Arc::new(InMemoryUserRepository::new()),
        );

        let err = handler.handle(PostId::new()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(ref m) if m == "Post not found."));
    }
}
