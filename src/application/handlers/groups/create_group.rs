//! CreateGroupHandler - founds a group with its creator as first member.

use std::sync::Arc;

use tracing::info;

use crate::application::AppError;
use crate::domain::foundation::{GroupId, UserId};
use crate::domain::group::{GroupSettings, TravelGroup};
use crate::ports::{GroupRepository, UserRepository};

use super::{name_clash, view_of, GroupView};

#[derive(Debug, Clone, Default)]
pub struct CreateGroupCommand {
    pub user_id: UserId,
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
    pub cover_image_url: Option<String>,
}

pub struct CreateGroupHandler {
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
}

impl CreateGroupHandler {
    pub fn new(groups: Arc<dyn GroupRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { groups, users }
    }

    pub async fn handle(&self, cmd: CreateGroupCommand) -> Result<GroupView, AppError> {
        let settings = GroupSettings::new(
            cmd.name.as_deref().unwrap_or(""),
            cmd.description.as_deref(),
            cmd.is_public,
            cmd.cover_image_url.as_deref(),
        )?;
        let group = TravelGroup::create(GroupId::new(), cmd.user_id, settings);
        self.groups.insert(&group).await.map_err(name_clash)?;

        info!(group_id = %group.id(), creator = %cmd.user_id, "Group created");
        view_of(self.users.as_ref(), group).await
    }
}
