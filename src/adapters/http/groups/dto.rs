//! Request and response bodies for group endpoints.

use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::UserCard;
use crate::application::handlers::{GroupView, MemberView};
use crate::domain::foundation::{GroupId, Page, Timestamp, UserId};
use crate::domain::group::GroupSettingsUpdate;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub cover_image_url: Option<String>,
}

impl From<GroupRequest> for GroupSettingsUpdate {
    fn from(req: GroupRequest) -> Self {
        GroupSettingsUpdate {
            name: req.name,
            description: req.description,
            is_public: req.is_public,
            cover_image_url: req.cover_image_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberResponse {
    pub user_id: UserId,
    pub user: Option<UserCard>,
    pub joined_at: Timestamp,
}

impl From<MemberView> for MemberResponse {
    fn from(view: MemberView) -> Self {
        Self {
            user_id: view.user_id,
            user: view.user.map(UserCard::from),
            joined_at: view.joined_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupResponse {
    pub id: GroupId,
    pub name: String,
    pub description: String,
    pub creator: Option<UserCard>,
    pub members: Vec<MemberResponse>,
    pub is_public: bool,
    pub cover_image_url: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<GroupView> for GroupResponse {
    fn from(view: GroupView) -> Self {
        let settings = view.group.settings();
        Self {
            id: *view.group.id(),
            name: settings.name.clone(),
            description: settings.description.clone(),
            is_public: settings.is_public,
            cover_image_url: settings.cover_image_url.clone(),
            created_at: *view.group.created_at(),
            updated_at: *view.group.updated_at(),
            creator: view.creator.map(UserCard::from),
            members: view.members.into_iter().map(MemberResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPageResponse {
    pub groups: Vec<GroupResponse>,
    pub current_page: u32,
    pub total_pages: u64,
    pub total_groups: u64,
}

impl From<Page<GroupView>> for GroupPageResponse {
    fn from(page: Page<GroupView>) -> Self {
        Self {
            current_page: page.page,
            total_pages: page.total_pages(),
            total_groups: page.total,
            groups: page.items.into_iter().map(GroupResponse::from).collect(),
        }
    }
}
