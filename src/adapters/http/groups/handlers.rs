//! HTTP handlers for group endpoints.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

use crate::adapters::http::error::MessageBody;
use crate::adapters::http::extract::{parse_id, JsonBody, PageParams};
use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::state::AppState;
use crate::application::handlers::{CreateGroupCommand, ListGroupsQuery, UpdateGroupCommand};
use crate::application::AppError;

use super::dto::{GroupPageResponse, GroupRequest, GroupResponse, MemberResponse};

/// POST /api/groups
pub async fn create_group(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    JsonBody(req): JsonBody<GroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    let view = state
        .create_group_handler()
        .handle(CreateGroupCommand {
            user_id: user.id,
            name: req.name,
            description: req.description,
            is_public: req.is_public,
            cover_image_url: req.cover_image_url,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

/// GET /api/groups
pub async fn list_groups(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<GroupPageResponse>, AppError> {
    let page = state
        .list_groups_handler()
        .handle(ListGroupsQuery {
            creator: None,
            page: params.to_request(),
        })
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/groups/user/:userId
pub async fn list_user_groups(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<GroupPageResponse>, AppError> {
    let page = state
        .list_groups_handler()
        .handle(ListGroupsQuery {
            creator: Some(parse_id(&user_id)?),
            page: params.to_request(),
        })
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/groups/:groupId
pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupResponse>, AppError> {
    let view = state.get_group_handler().handle(parse_id(&group_id)?).await?;
    Ok(Json(view.into()))
}

/// PUT /api/groups/:groupId
pub async fn update_group(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(group_id): Path<String>,
    JsonBody(req): JsonBody<GroupRequest>,
) -> Result<Json<GroupResponse>, AppError> {
    let view = state
        .update_group_handler()
        .handle(UpdateGroupCommand {
            user_id: user.id,
            group_id: parse_id(&group_id)?,
            update: req.into(),
        })
        .await?;
    Ok(Json(view.into()))
}

/// DELETE /api/groups/:groupId
pub async fn delete_group(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(group_id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    state
        .delete_group_handler()
        .handle(user.id, parse_id(&group_id)?)
        .await?;
    Ok(Json(MessageBody::new("Group deleted successfully.")))
}

/// POST /api/groups/:groupId/join
pub async fn join_group(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<MemberResponse>>, AppError> {
    let members = state
        .join_group_handler()
        .handle(user.id, parse_id(&group_id)?)
        .await?;
    Ok(Json(members.into_iter().map(MemberResponse::from).collect()))
}

/// POST /api/groups/:groupId/leave
pub async fn leave_group(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Path(group_id): Path<String>,
) -> Result<Json<MessageBody>, AppError> {
    state
        .leave_group_handler()
        .handle(user.id, parse_id(&group_id)?)
        .await?;
    Ok(Json(MessageBody::new("Successfully left the group.")))
}
