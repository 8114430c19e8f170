//! CreatePostHandler - publishes a post to the feed.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{PostId, UserId};
use crate::domain::social::{Post, PostText};
use crate::ports::{PostRepository, UserRepository};

use super::{with_author, PostView};

#[derive(Debug, Clone)]
pub struct CreatePostCommand {
    pub user_id: UserId,
    pub text: String,
}

pub struct CreatePostHandler {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CreatePostHandler {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn handle(&self, cmd: CreatePostCommand) -> Result<PostView, AppError> {
        let text = PostText::parse(&cmd.text)?;
        let post = Post::new(PostId::new(), cmd.user_id, text);
        self.posts.insert(&post).await?;

        info!(post_id = %post.id(), user_id = %cmd.user_id, "Post created");
        with_author(self.users.as_ref(), post).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryPostRepository, InMemoryUserRepository};
    use crate::application::handlers::test_support::seed_user;

    #[tokio::test]
    async fn post_is_trimmed_and_carries_author() {
        let users = Arc::new(InMemoryUserRepository::new());
        let alice = seed_user(&users, "alice").await;
        let handler = CreatePostHandler::new(Arc::new(InMemoryPostRepository::new()), users);

        let view = handler
            .handle(CreatePostCommand {
                user_id: *alice.id(),
                text: "  Landed in Lisbon  ".into(),
            })
            .await
            .unwrap();

        assert_eq!(view.post.text(), "Landed in Lisbon");
        assert_eq!(view.author.unwrap().username, "alice");
    }

    #[tokio::test]
    async fn blank_text_is_rejected() {
        let users = Arc::new(InMemoryUserRepository::new());
        let posts = Arc::new(InMemoryPostRepository::new());
        let handler = CreatePostHandler::new(posts, users);

        let err = handler
            .handle(CreatePostCommand {
                user_id: UserId::new(),
                text: "   ".into(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Validation(ref e) if e[0].msg == "Post text cannot be empty."));
    }
}
