//! UpdatePostHandler - owner edits the text of a post.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{OwnedByUser, PostId, UserId};
use crate::domain::social::PostText;
use crate::ports::{PostRepository, UserRepository};

use super::{find_post, with_author, PostView};

#[derive(Debug, Clone)]
pub struct UpdatePostCommand {
    pub user_id: UserId,
    pub post_id: PostId,
    pub text: String,
}

pub struct UpdatePostHandler {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl UpdatePostHandler {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn handle(&self, cmd: UpdatePostCommand) -> Result<PostView, AppError> {
        let mut post = find_post(self.posts.as_ref(), &cmd.post_id).await?;
        post.check_ownership(&cmd.user_id, "update")?;

        post.edit(PostText::parse(&cmd.text)?);
        self.posts.update(&post).await?;

        info!(post_id = %cmd.post_id, "Post updated");
        let version = post.version() + 1;
        with_author(self.users.as_ref(), post.with_version(version)).await
    }
}
