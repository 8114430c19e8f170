use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, Page, PageRequest, PostId, UserId};
use crate::domain::social::Post;
use crate::ports::PostRepository;

use super::{check_version, newest_first, Stored};

#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    posts: HashMap<PostId, Stored<Post>>,
    next_seq: u64,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.posts.contains_key(post.id()) {
            return Err(DomainError::duplicate("id"));
        }
        state.next_seq += 1;
        let seq = state.next_seq;
        state.posts.insert(
            *post.id(),
            Stored {
                doc: post.clone(),
                seq,
            },
        );
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .posts
            .get_mut(post.id())
            .ok_or_else(|| DomainError::new(ErrorCode::PostNotFound, "Post not found."))?;
        check_version("Post", stored.doc.version(), post.version())?;
        stored.doc = post.clone().with_version(post.version() + 1);
        Ok(())
    }

    async fn delete(&self, id: &PostId) -> Result<(), DomainError> {
        self.state.write().await.posts.remove(id);
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        Ok(self.state.read().await.posts.get(id).map(|s| s.doc.clone()))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let state = self.state.read().await;
        let rows = state.posts.values().collect();
        Ok(Page::from_sorted(
            newest_first(rows, |p: &Post| *p.created_at()),
            page,
        ))
    }

    async fn list_by_user(&self, user_id: &UserId, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let state = self.state.read().await;
        let rows = state
            .posts
            .values()
            .filter(|s| s.doc.user_id() == user_id)
            .collect();
        Ok(Page::from_sorted(
            newest_first(rows, |p: &Post| *p.created_at()),
            page,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::social::PostText;

    fn post_by(user_id: UserId, text: &str) -> Post {
        Post::new(PostId::new(), user_id, PostText::parse(text).unwrap())
    }

    #[tokio::test]
    async fn pages_newest_first_with_total() {
        let repo = InMemoryPostRepository::new();
        let author = UserId::new();
        for i in 0..12 {
            repo.insert(&post_by(author, &format!("post {}", i))).await.unwrap();
        }

        let first = repo.list(PageRequest::new(Some(1), Some(5))).await.unwrap();
        assert_eq!(first.total, 12);
        assert_eq!(first.total_pages(), 3);
        assert_eq!(first.items[0].text(), "post 11");

        let last = repo.list(PageRequest::new(Some(3), Some(5))).await.unwrap();
        assert_eq!(last.items.len(), 2);
        assert_eq!(last.items[1].text(), "post 0");
    }

    #[tokio::test]
    async fn filters_by_author() {
        let repo = InMemoryPostRepository::new();
        let alice = UserId::new();
        repo.insert(&post_by(alice, "mine")).await.unwrap();
        repo.insert(&post_by(UserId::new(), "theirs")).await.unwrap();

        let page = repo.list_by_user(&alice, PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].text(), "mine");
    }

    #[tokio::test]
    async fn edit_bumps_version() {
        let repo = InMemoryPostRepository::new();
        let mut post = post_by(UserId::new(), "draft");
        repo.insert(&post).await.unwrap();

        post.edit(PostText::parse("final").unwrap());
        repo.update(&post).await.unwrap();

        let stored = repo.find_by_id(post.id()).await.unwrap().unwrap();
        assert_eq!(stored.text(), "final");
        assert_eq!(stored.version(), 2);
        assert!(repo.update(&post).await.is_err());
    }
}
