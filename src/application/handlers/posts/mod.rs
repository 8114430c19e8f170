//! Social feed handlers.

mod create_post;
mod delete_post;
mod get_post;
mod list_posts;
mod update_post;

pub use create_post::{CreatePostCommand, CreatePostHandler};
pub use delete_post::DeletePostHandler;
pub use get_post::GetPostHandler;
pub use list_posts::{ListPostsHandler, ListPostsQuery};
pub use update_post::{UpdatePostCommand, UpdatePostHandler};

use crate::application::AppError;
use crate::domain::foundation::{Page, PostId, UserId};
use crate::domain::social::Post;
use crate::ports::{PostRepository, UserRepository};

use super::{load_summaries, UserSummary};

const POST_NOT_FOUND: &str = "Post not found.";

/// A post with its author card. `author` is `None` once the account is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct PostView {
    pub post: Post,
    pub author: Option<UserSummary>,
}

async fn with_author(users: &dyn UserRepository, post: Post) -> Result<PostView, AppError> {
    let author = users.find_by_id(post.user_id()).await?.map(|u| UserSummary::from(&u));
    Ok(PostView { post, author })
}

async fn with_authors(users: &dyn UserRepository, page: Page<Post>) -> Result<Page<PostView>, AppError> {
    let ids: Vec<UserId> = page.items.iter().map(|p| *p.user_id()).collect();
    let authors = load_summaries(users, ids).await?;
    Ok(page.map(|post| {
        let author = authors.get(post.user_id()).cloned();
        PostView { post, author }
    }))
}

async fn find_post(posts: &dyn PostRepository, post_id: &PostId) -> Result<Post, AppError> {
    posts
        .find_by_id(post_id)
        .await?
        .ok_or_else(|| AppError::not_found(POST_NOT_FOUND))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::adapters::memory::InMemoryPostRepository;
    use crate::domain::foundation::{PostId, UserId};
    use crate::domain::social::{Post, PostText};
    use crate::ports::PostRepository;

    pub async fn seed_post(posts: &InMemoryPostRepository, author: UserId, text: &str) -> Post {
        let post = Post::new(PostId::new(), author, PostText::parse(text).unwrap());
        posts.insert(&post).await.unwrap();
        post
    }
}
