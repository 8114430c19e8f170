//! PostgreSQL implementation of PostRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, Page, PageRequest, PostId, Timestamp, UserId};
use crate::domain::social::Post;
use crate::ports::PostRepository;

use super::{db_error, page_bounds, page_of};

pub struct PostgresPostRepository {
    pool: PgPool,
}

impl PostgresPostRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    text: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Post::reconstitute(
            PostId::from_uuid(row.id),
            UserId::from_uuid(row.user_id),
            row.text,
            Timestamp::from_datetime(row.created_at),
            Timestamp::from_datetime(row.updated_at),
            row.version,
        )
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: &Post) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, user_id, text, created_at, updated_at, version)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.user_id().as_uuid())
        .bind(post.text())
        .bind(post.created_at().as_datetime())
        .bind(post.updated_at().as_datetime())
        .bind(post.version())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("insert post", e))?;
        Ok(())
    }

    async fn update(&self, post: &Post) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE posts SET text = $3, updated_at = $4, version = version + 1
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(post.id().as_uuid())
        .bind(post.version())
        .bind(post.text())
        .bind(post.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("update post", e))?;

        if result.rows_affected() == 0 {
            return match self.find_by_id(post.id()).await? {
                Some(_) => Err(DomainError::concurrent_modification("Post")),
                None => Err(DomainError::new(ErrorCode::PostNotFound, "Post not found.")),
            };
        }
        Ok(())
    }

    async fn delete(&self, id: &PostId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| db_error("delete post", e))?;
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, DomainError> {
        let row: Option<PostRow> = sqlx::query_as(
            "SELECT id, user_id, text, created_at, updated_at, version FROM posts WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("fetch post", e))?;
        Ok(row.map(Post::from))
    }

    async fn list(&self, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let (limit, offset) = page_bounds(page);
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, text, created_at, updated_at, version
            FROM posts
            ORDER BY created_at DESC, id
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list posts", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count posts", e))?;

        Ok(page_of(rows.into_iter().map(Post::from).collect(), total, page))
    }

    async fn list_by_user(&self, user_id: &UserId, page: PageRequest) -> Result<Page<Post>, DomainError> {
        let (limit, offset) = page_bounds(page);
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT id, user_id, text, created_at, updated_at, version
            FROM posts
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("list posts", e))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE user_id = $1")
            .bind(user_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| db_error("count posts", e))?;

        Ok(page_of(rows.into_iter().map(Post::from).collect(), total, page))
    }
}
