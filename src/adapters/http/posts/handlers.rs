//! HTTP handlers for feed endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapters::http::error::MessageBody;
use crate::adapters::http::extract::{parse_id, JsonBody, PageParams};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{CreatePostCommand, ListPostsQuery, UpdatePostCommand};
use crate::application::AppError;

use super::dto::{PostPageResponse, PostRequest, PostResponse};

/// POST /api/posts
pub async fn create_post(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(req): JsonBody<PostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let view = state
        .create_post_handler()
        .handle(CreatePostCommand {
            user_id: user.id,
            text: req.text,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(PostResponse::from(view))))
}

/// GET /api/posts
pub async fn list_posts(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<PostPageResponse>, AppError> {
    let page = state
        .list_posts_handler()
        .handle(ListPostsQuery {
            author: None,
            page: params.to_request(),
        })
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/posts/user/:userId
pub async fn list_user_posts(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<PostPageResponse>, AppError> {
    let page = state
        .list_posts_handler()
        .handle(ListPostsQuery {
            author: Some(parse_id(&user_id)?),
            page: params.to_request(),
        })
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/posts/:postId
pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> Result<Json<PostResponse>, AppError> {
    let view = state.get_post_handler().handle(parse_id(&post_id)?).await?;
    Ok(Json(view.into()))
}

/// PUT /api/posts/:postId
pub async fn update_post(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<String>,
    JsonBody(req): JsonBody<PostRequest>,
) -> Result<Json<PostResponse>, AppError> {
    let view = state
        .update_post_handler()
        .handle(UpdatePostCommand {
            user_id: user.id,
            post_id: parse_id(&post_id)?,
            text: req.text,
        })
        .await?;
    Ok(Json(view.into()))
}

/// DELETE /api/posts/:postId
pub async fn delete_post(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(post_id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    state
        .delete_post_handler()
        .handle(user.id, parse_id(&post_id)?)
        .await?;
    Ok(Json(MessageBody::new("Post deleted successfully.")))
}
