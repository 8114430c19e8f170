//! ListPostsHandler - paginated feed, optionally for one author.

use std::sync::Arc;

use crate::application::AppError;
use crate::domain::foundation::{Page, PageRequest, UserId};
use crate::ports::{PostRepository, UserRepository};

use super::{with_authors, PostView};

#[derive(Debug, Clone, Copy, Default)]
pub struct ListPostsQuery {
    /// Restrict to one author; the author must exist.
    pub author: Option<UserId>,
    pub page: PageRequest,
}

pub struct ListPostsHandler {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl ListPostsHandler {
    pub fn new(posts: Arc<dyn PostRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { posts, users }
    }

    pub async fn handle(&self, query: ListPostsQuery) -> Result<Page<PostView>, AppError> {
        let page = match query.author {
            Some(author) => {
                if self.users.find_by_id(&author).await?.is_none() {
                    return Err(AppError::not_found("User not found."));
                }
                self.posts.list_by_user(&author, query.page).await?
            }
            None => self.posts.list(query.page).await?,
        };
        with_authors(self.users.as_ref(), page).await
    }
}
