//! Request and response bodies for feed endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::UserCard;
use crate::application::handlers::PostView;
use crate::domain::foundation::{Page, PostId, Timestamp};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostRequest {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: PostId,
    pub text: String,
    /// `null` once the author's account is gone.
    pub user: Option<UserCard>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<PostView> for PostResponse {
    fn from(view: PostView) -> Self {
        Self {
            id: *view.post.id(),
            text: view.post.text().to_string(),
            user: view.author.map(UserCard::from),
            created_at: *view.post.created_at(),
            updated_at: *view.post.updated_at(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPageResponse {
    pub posts: Vec<PostResponse>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_posts: u64,
}

impl From<Page<PostView>> for PostPageResponse {
    fn from(page: Page<PostView>) -> Self {
        Self {
            current_page: page.page,
            total_pages: page.total_pages(),
            total_posts: page.total,
            posts: page.items.into_iter().map(PostResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{PageRequest, UserId};
    use crate::domain::social::{Post, PostText};

    #[test]
    fn page_envelope_uses_feed_field_names() {
        let post = Post::new(PostId::new(), UserId::new(), PostText::parse("Hello").unwrap());
        let page = Page::new(
            vec![PostView { post, author: None }],
            11,
            PageRequest::new(Some(2), Some(10)),
        );

        let json = serde_json::to_value(PostPageResponse::from(page)).unwrap();

        assert_eq!(json["currentPage"], 2);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["totalPosts"], 11);
        assert_eq!(json["posts"][0]["text"], "Hello");
        assert_eq!(json["posts"][0]["user"], serde_json::Value::Null);
    }
}
